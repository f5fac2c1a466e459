//! Application state for shared services

use std::sync::Arc;

use crate::domain::DeliverableSource;
use crate::infrastructure::services::DeliverableCacheService;

/// Application state shared across request handlers.
///
/// The cache is explicitly constructed at process start and injected here
/// rather than living in ambient global state.
#[derive(Clone)]
pub struct AppState {
    pub deliverables: Arc<dyn DeliverableSource>,
    pub cache: Arc<DeliverableCacheService>,
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(
        deliverables: Arc<dyn DeliverableSource>,
        cache: Arc<DeliverableCacheService>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            deliverables,
            cache,
            webhook_secret,
        }
    }
}
