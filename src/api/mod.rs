//! HTTP API layer

pub mod debug;
pub mod deliverables;
pub mod docs;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod webhooks;

pub use router::create_router;
pub use state::AppState;
