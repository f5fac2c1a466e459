use serde::Deserialize;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(skip)]
    pub airtable: AirtableConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Credentialed CORS allow-list, expressed as anchored origin patterns.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origin_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Entry TTL in seconds
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

/// Airtable credentials and identifiers, read from the canonical
/// environment variables (`AIRTABLE_PAT`, `BASE_ID`, `TABLE_ID`, `VIEW_ID`,
/// `PHONE_FIELD`, `AIRTABLE_WEBHOOK_SECRET`).
///
/// Absence is logged at startup but only enforced when the fetch or
/// webhook paths are actually exercised.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AirtableConfig {
    #[serde(rename = "airtable_pat")]
    pub pat: Option<String>,
    pub base_id: Option<String>,
    pub table_id: Option<String>,
    pub view_id: Option<String>,
    pub phone_field: Option<String>,
    #[serde(rename = "airtable_webhook_secret")]
    pub webhook_secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
            cache: CacheConfig::default(),
            airtable: AirtableConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin_patterns: vec![
                r"^https://deliverables-frontend(-.*)?\.vercel\.app$".to_string(),
                r"^https://.*\.use2\.devtunnels\.ms$".to_string(),
                r"^http://localhost:5173$".to_string(),
                r"^http://localhost:3000$".to_string(),
                r"^http://127\.0\.0\.1:5500$".to_string(),
            ],
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600, // 1 hour
            max_capacity: 10_000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origin_patterns"),
            )
            .build()?;

        let mut app: AppConfig = config.try_deserialize()?;
        app.airtable = AirtableConfig::from_env()?;

        Ok(app)
    }
}

impl AirtableConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }

    /// Logs which options are present. None of them are required to boot,
    /// but the fetch and webhook paths fail without them.
    pub fn log_presence(&self) {
        log_option("AIRTABLE_PAT", self.pat.is_some());
        log_option("BASE_ID", self.base_id.is_some());
        log_option("TABLE_ID", self.table_id.is_some());
        log_option("VIEW_ID", self.view_id.is_some());
        log_option("PHONE_FIELD", self.phone_field.is_some());
        log_option("AIRTABLE_WEBHOOK_SECRET", self.webhook_secret.is_some());
    }
}

fn log_option(name: &str, loaded: bool) {
    if loaded {
        info!("{} loaded: true", name);
    } else {
        warn!("{} loaded: false", name);
    }
}
