mod app_config;

pub use app_config::{
    AirtableConfig, AppConfig, CacheConfig, CorsConfig, LogFormat, LoggingConfig, ServerConfig,
};
