//! Phone-keyed caching of deliverable record groups

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::domain::cache::{Cache, CacheExt};
use crate::domain::{DeliverableRecord, DeliverablesPayload, DomainError};

/// Sentinel segment for the unfiltered group
const ALL_RECORDS_KEY: &str = "ALL";

/// Configuration for deliverable caching
#[derive(Debug, Clone)]
pub struct DeliverableCacheConfig {
    /// Namespace prefix for cache keys
    pub namespace: String,
    /// TTL applied to every stored group
    pub default_ttl: Duration,
    /// Field name holding the phone number, used to derive group keys.
    /// When unset, incoming records cannot be grouped and are dropped.
    pub phone_field: Option<String>,
}

impl Default for DeliverableCacheConfig {
    fn default() -> Self {
        Self {
            namespace: "deliverables".to_string(),
            default_ttl: Duration::from_secs(3600), // 1 hour
            phone_field: None,
        }
    }
}

impl DeliverableCacheConfig {
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_phone_field(mut self, field: impl Into<String>) -> Self {
        self.phone_field = Some(field.into());
        self
    }
}

/// Counts returned by a warmup load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmupSummary {
    /// Distinct phone groups written
    pub phones_loaded: usize,
    /// Total records received, dropped ones included
    pub records_loaded: usize,
    /// Records without a usable phone field
    pub records_dropped: usize,
}

/// Service layering the deliverables contract over a generic cache:
/// group reads and writes keyed by phone, record upserts from webhook
/// events, and bulk warmup loads.
#[derive(Debug)]
pub struct DeliverableCacheService {
    cache: Arc<dyn Cache>,
    config: DeliverableCacheConfig,
    dropped_records: AtomicU64,
}

impl DeliverableCacheService {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_config(cache, DeliverableCacheConfig::default())
    }

    pub fn with_config(cache: Arc<dyn Cache>, config: DeliverableCacheConfig) -> Self {
        Self {
            cache,
            config,
            dropped_records: AtomicU64::new(0),
        }
    }

    /// Derives the cache key for a phone group (`None` = the unfiltered
    /// "ALL" group).
    pub fn cache_key(&self, phone: Option<&str>) -> String {
        format!(
            "{}:{}",
            self.config.namespace,
            phone.unwrap_or(ALL_RECORDS_KEY)
        )
    }

    /// Returns the cached group for a phone, if present and not expired.
    pub async fn group(
        &self,
        phone: Option<&str>,
    ) -> Result<Option<DeliverablesPayload>, DomainError> {
        self.cache.get(&self.cache_key(phone)).await
    }

    /// Stores a group under the phone's key with the default TTL.
    pub async fn store_group(
        &self,
        phone: Option<&str>,
        payload: &DeliverablesPayload,
    ) -> Result<(), DomainError> {
        self.cache
            .set(&self.cache_key(phone), payload, self.config.default_ttl)
            .await
    }

    /// Applies a single record to its phone group: replaces the record if
    /// its id already exists, otherwise appends it. Records without a
    /// usable phone field are dropped and counted; returns whether the
    /// record was applied.
    pub async fn update_record(&self, record: DeliverableRecord) -> Result<bool, DomainError> {
        let Some(phone) = self.record_phone(&record) else {
            self.count_dropped(&record.id);
            return Ok(false);
        };

        let key = self.cache_key(Some(&phone));
        let mut payload: DeliverablesPayload = self.cache.get(&key).await?.unwrap_or_default();

        payload.upsert(record);
        self.cache
            .set(&key, &payload, self.config.default_ttl)
            .await?;

        Ok(true)
    }

    /// Replaces the entire cache contents: clears every entry, groups the
    /// incoming records by phone, and writes one entry per group.
    pub async fn warm(
        &self,
        records: Vec<DeliverableRecord>,
    ) -> Result<WarmupSummary, DomainError> {
        self.cache.clear().await?;

        let total = records.len();
        let mut groups: BTreeMap<String, Vec<DeliverableRecord>> = BTreeMap::new();
        let mut dropped = 0usize;

        for record in records {
            match self.record_phone(&record) {
                Some(phone) => groups.entry(phone).or_default().push(record),
                None => {
                    self.count_dropped(&record.id);
                    dropped += 1;
                }
            }
        }

        for (phone, group) in &groups {
            let payload = DeliverablesPayload::new(group.clone());
            self.store_group(Some(phone), &payload).await?;
        }

        Ok(WarmupSummary {
            phones_loaded: groups.len(),
            records_loaded: total,
            records_dropped: dropped,
        })
    }

    /// Removes all cached entries.
    pub async fn clear(&self) -> Result<(), DomainError> {
        self.cache.clear().await
    }

    /// Total records dropped for lack of a phone field since startup.
    pub fn records_dropped(&self) -> u64 {
        self.dropped_records.load(Ordering::Relaxed)
    }

    fn record_phone(&self, record: &DeliverableRecord) -> Option<String> {
        let field = self.config.phone_field.as_deref()?;
        record.phone(field)
    }

    fn count_dropped(&self, record_id: &str) {
        self.dropped_records.fetch_add(1, Ordering::Relaxed);
        debug!(record_id, "record has no phone field, dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryCache;
    use serde_json::{Map, json};

    fn service() -> DeliverableCacheService {
        DeliverableCacheService::with_config(
            Arc::new(InMemoryCache::new()),
            DeliverableCacheConfig::default().with_phone_field("Celular"),
        )
    }

    fn record(id: &str, phone: Option<&str>) -> DeliverableRecord {
        let mut fields = Map::new();
        if let Some(phone) = phone {
            fields.insert("Celular".to_string(), json!(phone));
        }
        DeliverableRecord::new(id, fields)
    }

    #[test]
    fn test_cache_key_derivation() {
        let service = service();
        assert_eq!(service.cache_key(Some("555")), "deliverables:555");
        assert_eq!(service.cache_key(None), "deliverables:ALL");
    }

    #[tokio::test]
    async fn test_group_roundtrip() {
        let service = service();
        let payload = DeliverablesPayload::new(vec![record("rec1", Some("555"))]);

        service.store_group(Some("555"), &payload).await.unwrap();

        let cached = service.group(Some("555")).await.unwrap();
        assert_eq!(cached, Some(payload));
    }

    #[tokio::test]
    async fn test_update_record_initializes_group() {
        let service = service();

        let applied = service.update_record(record("rec1", Some("555"))).await.unwrap();
        assert!(applied);

        let group = service.group(Some("555")).await.unwrap().unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.records[0].id, "rec1");
    }

    #[tokio::test]
    async fn test_update_record_replaces_by_id() {
        let service = service();
        service.update_record(record("rec1", Some("555"))).await.unwrap();

        let mut fields = Map::new();
        fields.insert("Celular".to_string(), json!("555"));
        fields.insert("Crewstr".to_string(), json!("updated"));
        service
            .update_record(DeliverableRecord::new("rec1", fields))
            .await
            .unwrap();

        let group = service.group(Some("555")).await.unwrap().unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.records[0].fields.get("Crewstr"), Some(&json!("updated")));
    }

    #[tokio::test]
    async fn test_update_record_appends_new_id() {
        let service = service();
        service.update_record(record("rec1", Some("555"))).await.unwrap();
        service.update_record(record("rec2", Some("555"))).await.unwrap();

        let group = service.group(Some("555")).await.unwrap().unwrap();
        assert_eq!(group.len(), 2);
    }

    #[tokio::test]
    async fn test_update_record_is_idempotent() {
        let service = service();
        service.update_record(record("rec1", Some("555"))).await.unwrap();
        service.update_record(record("rec1", Some("555"))).await.unwrap();

        let group = service.group(Some("555")).await.unwrap().unwrap();
        assert_eq!(group.len(), 1);
    }

    #[tokio::test]
    async fn test_update_record_without_phone_is_dropped() {
        let service = service();

        let applied = service.update_record(record("rec1", None)).await.unwrap();
        assert!(!applied);
        assert_eq!(service.records_dropped(), 1);
    }

    #[tokio::test]
    async fn test_update_record_without_configured_field_is_dropped() {
        let service = DeliverableCacheService::new(Arc::new(InMemoryCache::new()));

        let applied = service.update_record(record("rec1", Some("555"))).await.unwrap();
        assert!(!applied);
        assert_eq!(service.records_dropped(), 1);
    }

    #[tokio::test]
    async fn test_warm_groups_by_phone() {
        let service = service();

        let summary = service
            .warm(vec![
                record("rec1", Some("555")),
                record("rec2", Some("555")),
                record("rec3", Some("777")),
            ])
            .await
            .unwrap();

        assert_eq!(summary.phones_loaded, 2);
        assert_eq!(summary.records_loaded, 3);
        assert_eq!(summary.records_dropped, 0);

        assert_eq!(service.group(Some("555")).await.unwrap().unwrap().len(), 2);
        assert_eq!(service.group(Some("777")).await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_warm_clears_prior_state() {
        let service = service();
        service
            .store_group(Some("999"), &DeliverablesPayload::new(vec![record("old", Some("999"))]))
            .await
            .unwrap();

        service.warm(vec![record("rec1", Some("555"))]).await.unwrap();

        assert!(service.group(Some("999")).await.unwrap().is_none());
        assert!(service.group(Some("555")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_warm_drops_and_counts_phoneless_records() {
        let service = service();

        let summary = service
            .warm(vec![record("rec1", Some("555")), record("rec2", None)])
            .await
            .unwrap();

        assert_eq!(summary.phones_loaded, 1);
        assert_eq!(summary.records_loaded, 2);
        assert_eq!(summary.records_dropped, 1);
        assert_eq!(service.records_dropped(), 1);
    }

    #[tokio::test]
    async fn test_warm_with_empty_list() {
        let service = service();

        let summary = service.warm(vec![]).await.unwrap();

        assert_eq!(summary.phones_loaded, 0);
        assert_eq!(summary.records_loaded, 0);
    }
}
