//! Deliverable domain - records served to the frontend and cached by phone

mod entity;
mod source;

pub use entity::{DeliverableRecord, DeliverablesPayload};
pub use source::DeliverableSource;
