//! Configuration model for Tickerwire
//!
//! The whole service is driven by one YAML document. Secrets are written as
//! `${VAR}` placeholders and resolved from the environment at load time by
//! [`substitution::substitute_env_vars`].

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasterConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub world_news: WorldNewsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub routine: RoutineConfig,
    #[serde(default)]
    pub breaking: BreakingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Upper bound on a whole pipeline request
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            host: default_host(),
            http_port: default_http_port(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Shared secret expected in `x-cron-secret` or `Authorization: Bearer`
    #[serde(default)]
    pub cron_secret: Option<String>,
}

impl AuthConfig {
    /// The configured secret, trimmed, if it is actually set
    pub fn secret(&self) -> Option<&str> {
        resolved_secret(self.cron_secret.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketDataConfig {
    #[serde(default = "default_market_data_url")]
    pub base_url: String,
    #[serde(default = "default_market_news_url")]
    pub news_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_fetch_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_news_limit")]
    pub news_limit: u32,
    /// Days searched backwards from yesterday for the previous daily close
    #[serde(default = "default_previous_close_lookback_days")]
    pub previous_close_lookback_days: u32,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_market_data_url(),
            news_url: default_market_news_url(),
            api_key: None,
            api_secret: None,
            timeout_seconds: default_fetch_timeout_seconds(),
            news_limit: default_news_limit(),
            previous_close_lookback_days: default_previous_close_lookback_days(),
        }
    }
}

impl MarketDataConfig {
    /// Key id and secret, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((
            resolved_secret(self.api_key.as_deref())?,
            resolved_secret(self.api_secret.as_deref())?,
        ))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldNewsConfig {
    #[serde(default = "default_world_news_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_fetch_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_country")]
    pub country: String,
    /// Page size for the per-category headline fetches
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Cap on deduplicated items fed to generation
    #[serde(default = "default_max_world_articles")]
    pub max_articles: usize,
}

impl Default for WorldNewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_world_news_url(),
            api_key: None,
            timeout_seconds: default_fetch_timeout_seconds(),
            country: default_country(),
            page_size: default_page_size(),
            max_articles: default_max_world_articles(),
        }
    }
}

impl WorldNewsConfig {
    pub fn key(&self) -> Option<&str> {
        resolved_secret(self.api_key.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_generation_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_prompt_version")]
    pub prompt_version: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_url(),
            model: default_model(),
            api_key: None,
            timeout_seconds: default_generation_timeout_seconds(),
            prompt_version: default_prompt_version(),
            temperature: default_temperature(),
        }
    }
}

impl GenerationConfig {
    pub fn key(&self) -> Option<&str> {
        resolved_secret(self.api_key.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutineConfig {
    /// Maximum non-breaking articles per UTC day
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            daily_cap: default_daily_cap(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BreakingConfig {
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,
    #[serde(default = "default_max_events_per_run")]
    pub max_events_per_run: usize,
    /// Placeholder average volume used by the volume-spike rule
    #[serde(default = "default_baseline_volume")]
    pub baseline_volume: f64,
    /// Maximum concurrent snapshot fetches during detection
    #[serde(default = "default_detection_concurrency")]
    pub concurrency: usize,
}

impl Default for BreakingConfig {
    fn default() -> Self {
        Self {
            watchlist: default_watchlist(),
            max_events_per_run: default_max_events_per_run(),
            baseline_volume: default_baseline_volume(),
            concurrency: default_detection_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Tickers inserted into an empty store at startup
    #[serde(default)]
    pub seed_tickers: Vec<SeedTicker>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
            seed_tickers: Vec::new(),
        }
    }
}

impl StorageConfig {
    pub fn database_url(&self) -> Option<&str> {
        resolved_secret(self.database_url.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedTicker {
    pub symbol: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Webhook that receives `{paths: [...]}` after each publish
    #[serde(default)]
    pub revalidate_url: Option<String>,
    #[serde(default)]
    pub revalidate_token: Option<String>,
    #[serde(default = "default_revalidate_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            revalidate_url: None,
            revalidate_token: None,
            timeout_seconds: default_revalidate_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

/// Trimmed secret value, or `None` when empty or still an unresolved placeholder
pub fn resolved_secret(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    if value.is_empty() || substitution::has_unresolved_env_vars(value) {
        None
    } else {
        Some(value)
    }
}
