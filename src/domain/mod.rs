//! Domain layer - Core entities and abstractions

pub mod cache;
pub mod deliverable;
pub mod error;

pub use cache::{Cache, CacheExt};
pub use deliverable::{DeliverableRecord, DeliverableSource, DeliverablesPayload};
pub use error::DomainError;
