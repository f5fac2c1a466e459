//! Deliverables Gateway
//!
//! A small HTTP facade over an Airtable table of deliverable records:
//! - Cached reads grouped by phone number with a fixed TTL
//! - Webhook endpoints that apply single-record updates and bulk warmups
//!   directly to the cache
//! - Credentialed CORS for the frontend deployments that consume it

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::AppState;
use domain::DeliverableSource;
use domain::cache::Cache;
use infrastructure::airtable::AirtableClient;
use infrastructure::cache::{InMemoryCache, InMemoryCacheConfig};
use infrastructure::services::{DeliverableCacheConfig, DeliverableCacheService};

/// Builds the application state: the cache, the cache service and the
/// upstream client, wired from configuration.
pub fn create_app_state(config: &AppConfig) -> AppState {
    let ttl = Duration::from_secs(config.cache.ttl_secs);

    let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::with_config(
        InMemoryCacheConfig::default()
            .with_max_capacity(config.cache.max_capacity)
            .with_default_ttl(ttl),
    ));

    let mut cache_config = DeliverableCacheConfig::default().with_default_ttl(ttl);
    if let Some(phone_field) = &config.airtable.phone_field {
        cache_config = cache_config.with_phone_field(phone_field);
    }

    let cache_service = Arc::new(DeliverableCacheService::with_config(cache, cache_config));

    let deliverables: Arc<dyn DeliverableSource> =
        Arc::new(AirtableClient::new(config.airtable.clone()));

    AppState::new(
        deliverables,
        cache_service,
        config.airtable.webhook_secret.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_state_from_defaults() {
        let state = create_app_state(&AppConfig::default());

        assert!(state.webhook_secret.is_none());
        assert_eq!(state.cache.cache_key(Some("555")), "deliverables:555");
    }
}
