use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());
    parse_config(&content)
}

/// Parse a YAML document after environment substitution
pub fn parse_config(content: &str) -> Result<MasterConfig> {
    let substituted = substitution::substitute_env_vars(content)?;

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!(service = %config.service.name, "Configuration loaded successfully");
    Ok(config)
}

/// Starter configuration written by `tickerwire init`
///
/// Secrets are emitted as `${VAR}` placeholders.
#[instrument]
pub fn generate_default_config() -> MasterConfig {
    MasterConfig {
        service: ServiceConfig::default(),
        auth: AuthConfig {
            cron_secret: Some("${CRON_SECRET}".to_string()),
        },
        market_data: MarketDataConfig {
            api_key: Some("${ALPACA_API_KEY}".to_string()),
            api_secret: Some("${ALPACA_API_SECRET}".to_string()),
            ..Default::default()
        },
        world_news: WorldNewsConfig {
            api_key: Some("${NEWS_API_KEY}".to_string()),
            ..Default::default()
        },
        generation: GenerationConfig {
            api_key: Some("${GEMINI_API_KEY}".to_string()),
            ..Default::default()
        },
        routine: RoutineConfig::default(),
        breaking: BreakingConfig::default(),
        storage: StorageConfig {
            seed_tickers: default_watchlist()
                .into_iter()
                .map(|symbol| SeedTicker {
                    symbol,
                    priority: 0,
                    active: true,
                })
                .collect(),
            ..Default::default()
        },
        cache: CacheConfig::default(),
        logging: LoggingConfig::default(),
        metrics: MetricsConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let config = generate_default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: MasterConfig = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.storage.seed_tickers.len(), 25);
        assert_eq!(parsed.auth.cron_secret.as_deref(), Some("${CRON_SECRET}"));
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = parse_config(include_str!("../../../config/tickerwire.yaml")).unwrap();

        assert_eq!(config.routine.daily_cap, 50);
        assert_eq!(config.storage.seed_tickers.len(), 8);
        assert_eq!(config.storage.seed_tickers[0].priority, 10);
        assert!(config.storage.seed_tickers[3].active);
        assert_eq!(config.breaking.watchlist.len(), 25);
    }

    #[test]
    fn test_parse_config_reports_bad_yaml() {
        assert!(parse_config("service: [unclosed").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("tickerwire-config-{}.yaml", std::process::id()));
        save_config(&generate_default_config(), &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.routine.daily_cap, 50);

        let _ = fs::remove_file(&path);
    }
}
