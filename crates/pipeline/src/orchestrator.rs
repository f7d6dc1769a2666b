//! Pipeline orchestrator
//!
//! Holds the collaborators shared by every pipeline and the helpers that
//! bound external calls by timeout and cancellation. The pipelines
//! themselves live in `pipelines/`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::MarketSnapshot;
use content::{
    ArticlePublisher, ContentGenerator, GeneratedContent, GenerationRequest,
};
use detector::{BreakingEventDetector, DetectorConfig};
use market_data::{fetch_snapshot, MarketDataClient, WorldNewsClient};
use observability::metrics::{record_upstream_failure, PipelineMetrics};
use scheduler::TickerScheduler;
use scoring::SignalScorer;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::outcome::Stage;

/// Tunables for every pipeline
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Maximum non-breaking articles per UTC day
    pub daily_cap: u32,
    /// Symbols scanned by the breaking pipeline
    pub watchlist: Vec<String>,
    pub max_events_per_run: usize,
    /// Headlines fetched per snapshot
    pub news_limit: u32,
    pub world_page_size: u32,
    pub world_max_articles: usize,
    pub fetch_timeout: Duration,
    pub generation_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            daily_cap: config::default_daily_cap(),
            watchlist: config::default_watchlist(),
            max_events_per_run: config::default_max_events_per_run(),
            news_limit: config::default_news_limit(),
            world_page_size: config::default_page_size(),
            world_max_articles: config::default_max_world_articles(),
            fetch_timeout: Duration::from_secs(config::default_fetch_timeout_seconds()),
            generation_timeout: Duration::from_secs(config::default_generation_timeout_seconds()),
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &config::MasterConfig) -> Self {
        Self {
            daily_cap: config.routine.daily_cap,
            watchlist: config.breaking.watchlist.clone(),
            max_events_per_run: config.breaking.max_events_per_run,
            news_limit: config.market_data.news_limit,
            world_page_size: config.world_news.page_size,
            world_max_articles: config.world_news.max_articles,
            fetch_timeout: Duration::from_secs(config.market_data.timeout_seconds),
            generation_timeout: Duration::from_secs(config.generation.timeout_seconds),
        }
    }

    /// Detector settings derived from the breaking config
    ///
    /// Fetch timeout and news limit are taken from these settings when the
    /// orchestrator is built.
    pub fn detector_config(config: &config::BreakingConfig) -> DetectorConfig {
        DetectorConfig {
            baseline_volume: config.baseline_volume,
            concurrency: config.concurrency,
            ..Default::default()
        }
    }
}

/// External collaborators injected into the orchestrator
pub struct Collaborators {
    pub market: Arc<dyn MarketDataClient>,
    pub world: Arc<dyn WorldNewsClient>,
    pub generator: Arc<dyn ContentGenerator>,
    pub scheduler: Arc<TickerScheduler>,
    pub publisher: Arc<ArticlePublisher>,
}

/// Runs the article pipelines
pub struct Orchestrator {
    pub(crate) market: Arc<dyn MarketDataClient>,
    pub(crate) world: Arc<dyn WorldNewsClient>,
    pub(crate) generator: Arc<dyn ContentGenerator>,
    pub(crate) scheduler: Arc<TickerScheduler>,
    pub(crate) publisher: Arc<ArticlePublisher>,
    pub(crate) detector: BreakingEventDetector,
    pub(crate) scorer: SignalScorer,
    pub(crate) settings: PipelineSettings,
}

/// Why a guarded call did not complete
pub(crate) enum Interrupted {
    Cancelled,
    TimedOut,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators, mut detector: DetectorConfig, settings: PipelineSettings) -> Self {
        detector.fetch_timeout = settings.fetch_timeout;
        detector.news_limit = settings.news_limit;
        Self {
            detector: BreakingEventDetector::new(collaborators.market.clone(), detector),
            market: collaborators.market,
            world: collaborators.world,
            generator: collaborators.generator,
            scheduler: collaborators.scheduler,
            publisher: collaborators.publisher,
            scorer: SignalScorer,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn scorer(&self) -> &SignalScorer {
        &self.scorer
    }

    /// Fetch a snapshot for an on-demand score lookup
    pub async fn snapshot(&self, symbol: &str, cancel: &CancellationToken) -> Result<MarketSnapshot> {
        match guarded(cancel, self.settings.fetch_timeout, fetch_snapshot(&*self.market, symbol, self.settings.news_limit)).await {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(e)) => Err(PipelineError::UpstreamFetch(e.to_string())),
            Err(Interrupted::TimedOut) => {
                record_upstream_failure("market_data");
                Err(PipelineError::UpstreamFetch(format!("{symbol}: request timed out")))
            }
            Err(Interrupted::Cancelled) => Err(PipelineError::Cancelled),
        }
    }

    /// Snapshot for article generation; failures degrade to an empty snapshot
    ///
    /// Returns the snapshot and whether any market data was obtained.
    pub(crate) async fn snapshot_or_empty(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<(MarketSnapshot, bool)> {
        match self.snapshot(symbol, cancel).await {
            Ok(snapshot) => Ok((snapshot, true)),
            Err(PipelineError::Cancelled) => Err(PipelineError::Cancelled),
            Err(e) => {
                warn!(symbol, error = %e, "No market data, continuing with an empty snapshot");
                Ok((MarketSnapshot::empty(symbol, now), false))
            }
        }
    }

    /// Generate content, substituting `placeholder` on any failure
    ///
    /// Returns the content and whether it came from the generator.
    pub(crate) async fn generate_or_placeholder(
        &self,
        request: &GenerationRequest,
        metrics: &PipelineMetrics,
        cancel: &CancellationToken,
        placeholder: impl FnOnce() -> GeneratedContent,
    ) -> Result<(GeneratedContent, bool)> {
        stage(Stage::Generating);

        if !self.generator.is_configured() {
            warn!("Generator not configured, publishing placeholder content");
            metrics.record_fallback();
            return Ok((placeholder(), false));
        }

        match guarded(cancel, self.settings.generation_timeout, self.generator.generate(request)).await {
            Ok(Ok(content)) => Ok((content, true)),
            Ok(Err(e)) => {
                record_upstream_failure("generation");
                warn!(error = %e, "Generation failed, publishing placeholder content");
                metrics.record_fallback();
                Ok((placeholder(), false))
            }
            Err(Interrupted::TimedOut) => {
                record_upstream_failure("generation");
                warn!("Generation timed out, publishing placeholder content");
                metrics.record_fallback();
                Ok((placeholder(), false))
            }
            Err(Interrupted::Cancelled) => Err(PipelineError::Cancelled),
        }
    }

    /// Fail unless a required collaborator has its credentials
    pub(crate) fn require_generator(&self) -> Result<()> {
        if self.generator.is_configured() {
            Ok(())
        } else {
            Err(PipelineError::Configuration("GEMINI_API_KEY is not configured".to_string()))
        }
    }
}

/// Run `future` unless `cancel` fires or `limit` elapses first
pub(crate) async fn guarded<F: Future>(
    cancel: &CancellationToken,
    limit: Duration,
    future: F,
) -> std::result::Result<F::Output, Interrupted> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupted::Cancelled),
        result = tokio::time::timeout(limit, future) => result.map_err(|_| Interrupted::TimedOut),
    }
}

/// Abort before any write once the run is cancelled
pub(crate) fn ensure_live(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}

pub(crate) fn stage(stage: Stage) {
    debug!(stage = stage.as_str(), "Pipeline stage");
}
