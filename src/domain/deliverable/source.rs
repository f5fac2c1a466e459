//! Upstream source abstraction

use std::fmt::Debug;

use async_trait::async_trait;

use super::DeliverableRecord;
use crate::domain::DomainError;

/// Trait for listing deliverable records from the upstream table service.
///
/// `phone` scopes the listing to a single phone number; `None` lists all
/// records unfiltered. Failures propagate as-is; there is no retry.
#[async_trait]
pub trait DeliverableSource: Send + Sync + Debug {
    async fn list(&self, phone: Option<&str>) -> Result<Vec<DeliverableRecord>, DomainError>;
}
