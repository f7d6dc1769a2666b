//! Tickerwire CLI and Server Binary
//!
//! Entry point for initializing, validating and starting the pipeline
//! service, and for one-off symbol ratings.

mod app;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{generate_default_config, load_config, save_config, validate_config, MasterConfig};
use market_data::{fetch_snapshot, AlpacaClient};
use observability::{init_logging, init_metrics, LogFormat};
use scoring::{format_rating_markdown, SignalScorer};
use server::{HttpServer, Server, ServerConfig, ShutdownController};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            http,
            log_format,
        } => start_command(config, http, log_format).await,
        Commands::Validate { config } => {
            init_logging("tickerwire", LogFormat::Compact)?;
            validate_command(config).await
        }
        Commands::Init { output, force } => {
            init_logging("tickerwire", LogFormat::Compact)?;
            init_command(output, force).await
        }
        Commands::Score { symbol, config, json } => {
            init_logging("tickerwire", LogFormat::Compact)?;
            score_command(symbol, config, json).await
        }
    }
}

/// Log warnings and refuse to continue on validation errors
fn check_config(config: &MasterConfig) -> Result<()> {
    let report = validate_config(config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(error_count = report.errors.len(), "Configuration validation failed");
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start due to configuration errors");
    }

    Ok(())
}

fn load_validated(config_path: &Path) -> Result<MasterConfig> {
    let config = load_config(config_path)?;
    check_config(&config)?;
    Ok(config)
}

async fn start_command(
    config_path: PathBuf,
    http_override: Option<u16>,
    log_format: Option<cli::LogFormat>,
) -> Result<()> {
    let mut config = load_config(&config_path)?;

    let format = match log_format {
        Some(format) => LogFormat::parse(format.as_str()),
        None => LogFormat::parse(&config.logging.format),
    }
    .unwrap_or_default();
    init_logging(&config.service.name, format)?;

    if let Some(port) = http_override {
        debug!(port, "Overriding HTTP port");
        config.service.http_port = port;
    }
    check_config(&config)?;

    if config.metrics.enabled {
        init_metrics(config.metrics.port)?;
    }

    let shutdown = ShutdownController::with_signals();
    let router = app::build_router(&config, shutdown.child_token()).await?;

    let server_config = ServerConfig::new(config.service.host.clone(), config.service.http_port)
        .with_request_timeout(Duration::from_secs(config.service.request_timeout_seconds));

    info!(
        service = %config.service.name,
        host = %server_config.host,
        port = server_config.port,
        "Starting Tickerwire"
    );

    HttpServer::new(server_config, router)
        .run(shutdown.token())
        .await?;

    info!("Tickerwire stopped");
    Ok(())
}

async fn validate_command(config_path: PathBuf) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {} on {}:{}", config.service.name, config.service.host, config.service.http_port);
    println!("Storage: {:?}", config.storage.backend);
    println!("Daily routine cap: {}", config.routine.daily_cap);
    println!("Breaking watchlist: {} symbols", config.breaking.watchlist.len());

    Ok(())
}

async fn init_command(output_path: PathBuf, force: bool) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    if output_path.exists() && !force {
        anyhow::bail!("{:?} already exists, pass --force to overwrite", output_path);
    }

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, &output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Set CRON_SECRET and the provider keys (ALPACA_API_KEY, ALPACA_API_SECRET, NEWS_API_KEY, GEMINI_API_KEY)");
    println!("  2. Run 'tickerwire validate --config {:?}' to check configuration", output_path);
    println!("  3. Run 'tickerwire start --config {:?}' to start the service", output_path);

    Ok(())
}

async fn score_command(symbol: String, config_path: PathBuf, json: bool) -> Result<()> {
    let config = load_validated(&config_path)?;
    let symbol = common::normalize_symbol(&symbol)?;

    let client = AlpacaClient::from_config(&config.market_data)?;
    let snapshot = fetch_snapshot(&client, &symbol, config.market_data.news_limit)
        .await
        .with_context(|| format!("Failed to fetch market data for {symbol}"))?;

    let score = SignalScorer.score(&snapshot);
    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        println!("# {symbol}\n");
        println!("{}", format_rating_markdown(&score));
    }

    Ok(())
}
