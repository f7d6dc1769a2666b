//! Wiring of collaborators into the pipeline router

use anyhow::{Context, Result};
use axum::Router;
use common::{normalize_symbol, Ticker};
use config::{MasterConfig, StorageBackend};
use content::{ArticlePublisher, CacheInvalidator, GeminiGenerator, HttpRevalidator, NoopInvalidator};
use market_data::{AlpacaClient, NewsApiClient};
use pipeline::api::{create_router, ApiState};
use pipeline::{Collaborators, Orchestrator, PipelineSettings};
use scheduler::TickerScheduler;
use server::HealthState;
use std::sync::Arc;
use storage::{ArticleStore, ContentStore, InMemoryContentStore, PostgresContentStore, TickerStore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The two repository views of one content store
pub struct Stores {
    pub tickers: Arc<dyn TickerStore>,
    pub articles: Arc<dyn ArticleStore>,
}

impl Stores {
    fn from_store<S: ContentStore + 'static>(store: Arc<S>) -> Self {
        Self {
            tickers: store.clone(),
            articles: store,
        }
    }
}

/// Open the configured backend and seed it with the configured tickers
pub async fn open_stores(config: &MasterConfig) -> Result<Stores> {
    let stores = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory content store");
            Stores::from_store(Arc::new(InMemoryContentStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url()
                .context("storage.database_url is required for the postgres backend")?;
            let store = PostgresContentStore::connect(url, config.storage.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            store.ensure_schema().await.context("Failed to prepare schema")?;
            info!("Using PostgreSQL content store");
            Stores::from_store(Arc::new(store))
        }
    };

    let mut seeds = Vec::with_capacity(config.storage.seed_tickers.len());
    for seed in &config.storage.seed_tickers {
        let ticker = Ticker::new(normalize_symbol(&seed.symbol)?, seed.priority);
        seeds.push(if seed.active { ticker } else { ticker.inactive() });
    }
    if !seeds.is_empty() {
        let inserted = stores.tickers.seed_tickers(seeds).await?;
        info!(inserted, "Seeded tickers");
    }

    Ok(stores)
}

/// Readiness flags reported by `/health`
pub fn health_state(config: &MasterConfig) -> HealthState {
    HealthState::new(config.service.name.clone(), env!("CARGO_PKG_VERSION"))
        .with_check("cron_secret", config.auth.secret().is_some())
        .with_check("market_data_credentials", config.market_data.credentials().is_some())
        .with_check("world_news_key", config.world_news.key().is_some())
        .with_check("generation_key", config.generation.key().is_some())
}

/// Build the orchestrator from the config and the opened stores
pub fn build_orchestrator(config: &MasterConfig, stores: Stores) -> Result<Orchestrator> {
    let market = Arc::new(AlpacaClient::from_config(&config.market_data)?);
    let world = Arc::new(NewsApiClient::from_config(&config.world_news)?);
    let generator = Arc::new(GeminiGenerator::from_config(&config.generation)?);

    let invalidator: Arc<dyn CacheInvalidator> = match HttpRevalidator::from_config(&config.cache)? {
        Some(revalidator) => Arc::new(revalidator),
        None => {
            warn!("No revalidate webhook configured, cache invalidation is a no-op");
            Arc::new(NoopInvalidator)
        }
    };

    let scheduler = Arc::new(TickerScheduler::new(stores.tickers, stores.articles.clone()));
    let publisher = Arc::new(ArticlePublisher::new(stores.articles, scheduler.clone(), invalidator));

    Ok(Orchestrator::new(
        Collaborators {
            market,
            world,
            generator,
            scheduler,
            publisher,
        },
        PipelineSettings::detector_config(&config.breaking),
        PipelineSettings::from_config(config),
    ))
}

/// Full router with pipeline, score and health routes
pub async fn build_router(config: &MasterConfig, shutdown: CancellationToken) -> Result<Router> {
    let stores = open_stores(config).await?;
    let orchestrator = Arc::new(build_orchestrator(config, stores)?);

    let state = ApiState::new(
        orchestrator,
        config.auth.secret().map(str::to_string),
        shutdown,
    );
    Ok(create_router(state, health_state(config)))
}
