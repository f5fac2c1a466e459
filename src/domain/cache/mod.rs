//! Cache domain - Generic caching abstraction layer

mod repository;

pub use repository::{Cache, CacheExt};
