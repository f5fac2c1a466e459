//! Application services

mod deliverable_cache_service;

pub use deliverable_cache_service::{
    DeliverableCacheConfig, DeliverableCacheService, WarmupSummary,
};
