use crate::*;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("{field} must be a positive number")]
    InvalidPositiveFloat { field: String },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: String, value: String },

    #[error("Breaking watchlist must contain at least one symbol")]
    EmptyWatchlist,

    #[error("Invalid symbol '{symbol}' in {field}")]
    InvalidSymbol { field: String, symbol: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Storage: {message}")]
    InvalidStorage { message: String },

    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_service(&config.service, &mut report);
    validate_secrets(config, &mut report);
    validate_providers(config, &mut report);
    validate_routine(&config.routine, &mut report);
    validate_breaking(&config.breaking, &mut report);
    validate_storage(&config.storage, &mut report);
    validate_cache(&config.cache, &mut report);

    if !["pretty", "json", "compact"].contains(&config.logging.format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(config.logging.format.clone()));
    }

    if config.metrics.enabled && config.metrics.port == 0 {
        report.add_error(positive("metrics.port"));
    }

    report
}

fn positive(field: &str) -> ValidationError {
    ValidationError::InvalidPositiveInteger {
        field: field.to_string(),
    }
}

fn check_url(field: &str, value: &str, report: &mut ValidationReport) {
    if Url::parse(value).is_err() {
        report.add_error(ValidationError::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn check_symbol(field: &str, symbol: &str, report: &mut ValidationReport) {
    let valid = !symbol.is_empty()
        && symbol.len() <= 12
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        report.add_error(ValidationError::InvalidSymbol {
            field: field.to_string(),
            symbol: symbol.to_string(),
        });
    }
}

fn validate_service(service: &ServiceConfig, report: &mut ValidationReport) {
    if service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }
    if service.http_port == 0 {
        report.add_error(positive("service.http_port"));
    }
    if service.request_timeout_seconds == 0 {
        report.add_error(positive("service.request_timeout_seconds"));
    }
}

fn validate_secrets(config: &MasterConfig, report: &mut ValidationReport) {
    if config.auth.secret().is_none() {
        report.add_warning(
            "auth.cron_secret",
            "Cron secret is not configured; every pipeline request will be rejected with 500",
        );
    }
    if config.market_data.credentials().is_none() {
        report.add_warning(
            "market_data.api_key",
            "Market data credentials are not configured; snapshots will carry no prices or news",
        );
    }
    if config.world_news.key().is_none() {
        report.add_warning(
            "world_news.api_key",
            "World news key is not configured; the world-news pipeline will fail with 500",
        );
    }
    if config.generation.key().is_none() {
        report.add_warning(
            "generation.api_key",
            "Generation key is not configured; articles will use placeholder content",
        );
    }
}

fn validate_providers(config: &MasterConfig, report: &mut ValidationReport) {
    let md = &config.market_data;
    check_url("market_data.base_url", &md.base_url, report);
    check_url("market_data.news_url", &md.news_url, report);
    if md.timeout_seconds == 0 {
        report.add_error(positive("market_data.timeout_seconds"));
    }
    if md.previous_close_lookback_days == 0 {
        report.add_error(positive("market_data.previous_close_lookback_days"));
    }

    let wn = &config.world_news;
    check_url("world_news.base_url", &wn.base_url, report);
    if wn.timeout_seconds == 0 {
        report.add_error(positive("world_news.timeout_seconds"));
    }
    if wn.max_articles == 0 {
        report.add_error(positive("world_news.max_articles"));
    }

    let generation = &config.generation;
    check_url("generation.base_url", &generation.base_url, report);
    if generation.timeout_seconds == 0 {
        report.add_error(positive("generation.timeout_seconds"));
    }
    if !(0.0..=2.0).contains(&generation.temperature) {
        report.add_error(ValidationError::InvalidTemperature(generation.temperature));
    }
}

fn validate_routine(routine: &RoutineConfig, report: &mut ValidationReport) {
    if routine.daily_cap == 0 {
        report.add_error(positive("routine.daily_cap"));
    }
}

fn validate_breaking(breaking: &BreakingConfig, report: &mut ValidationReport) {
    if breaking.watchlist.is_empty() {
        report.add_error(ValidationError::EmptyWatchlist);
    }
    for symbol in &breaking.watchlist {
        check_symbol("breaking.watchlist", symbol, report);
    }
    if breaking.max_events_per_run == 0 {
        report.add_error(positive("breaking.max_events_per_run"));
    }
    if breaking.concurrency == 0 {
        report.add_error(positive("breaking.concurrency"));
    }
    if breaking.baseline_volume.is_nan() || breaking.baseline_volume <= 0.0 {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "breaking.baseline_volume".to_string(),
        });
    }
}

fn validate_storage(storage: &StorageConfig, report: &mut ValidationReport) {
    match storage.backend {
        StorageBackend::Memory => {
            if storage.seed_tickers.is_empty() {
                report.add_default("storage.seed_tickers", "breaking.watchlist");
            }
        }
        StorageBackend::Postgres => match storage.database_url() {
            Some(url) => check_url("storage.database_url", url, report),
            None => report.add_error(ValidationError::InvalidStorage {
                message: "postgres backend requires database_url".to_string(),
            }),
        },
    }

    if storage.max_connections == 0 {
        report.add_error(positive("storage.max_connections"));
    }
    for seed in &storage.seed_tickers {
        check_symbol("storage.seed_tickers", &seed.symbol, report);
    }
}

fn validate_cache(cache: &CacheConfig, report: &mut ValidationReport) {
    match cache.revalidate_url.as_deref() {
        Some(url) if !url.trim().is_empty() => check_url("cache.revalidate_url", url, report),
        _ => report.add_default("cache.revalidate_url", "disabled (no-op invalidation)"),
    }
}
