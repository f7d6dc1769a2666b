//! Market snapshot assembly

use async_trait::async_trait;
use chrono::Utc;
use common::{MarketSnapshot, NewsItem, PriceBar};
use observability::metrics::record_upstream_failure;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{MarketDataError, Result};

/// Headlines requested per snapshot
pub const DEFAULT_NEWS_LIMIT: u32 = 5;

/// Client trait for a market-data provider
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Most recent bar; `Ok(None)` when the provider has none for the symbol
    async fn latest_bar(&self, symbol: &str) -> Result<Option<PriceBar>>;

    /// Close of the most recent completed daily bar before today
    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>>;

    /// Recent headlines tagged with the symbol, newest first
    async fn news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsItem>>;

    /// Fetch all three legs and assemble a snapshot
    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        fetch_snapshot(self, symbol, DEFAULT_NEWS_LIMIT).await
    }
}

/// Fetch bar, previous close and news concurrently
///
/// A failing leg degrades to `None` or an empty list. The call only fails
/// when every leg fails, which callers treat as "no data for this symbol".
pub async fn fetch_snapshot<C>(client: &C, symbol: &str, news_limit: u32) -> Result<MarketSnapshot>
where
    C: MarketDataClient + ?Sized,
{
    let (bar, previous_close, news) = tokio::join!(
        client.latest_bar(symbol),
        client.previous_close(symbol),
        client.news(symbol, news_limit),
    );

    if let (Err(e), Err(_), Err(_)) = (&bar, &previous_close, &news) {
        record_upstream_failure("market_data");
        return Err(MarketDataError::DataNotAvailable(format!("{}: {}", symbol, e)));
    }

    let bar = bar.unwrap_or_else(|e| degrade(symbol, "latest_bar", e));
    let previous_close = previous_close.unwrap_or_else(|e| degrade(symbol, "previous_close", e));
    let news = news.unwrap_or_else(|e| degrade(symbol, "news", e));

    let snapshot = MarketSnapshot::assemble(symbol, bar, previous_close, news, Utc::now());
    debug!(
        symbol,
        has_bar = snapshot.latest_bar.is_some(),
        change_percent = ?snapshot.change_percent,
        news = snapshot.news.len(),
        "Snapshot assembled"
    );
    Ok(snapshot)
}

fn degrade<T: Default>(symbol: &str, leg: &'static str, error: MarketDataError) -> T {
    record_upstream_failure("market_data");
    warn!(symbol, leg, %error, "Market data leg failed, continuing without it");
    T::default()
}

// ==================== Static Implementation ====================

/// Market data client serving fixed snapshots, for tests and offline runs
///
/// Unknown symbols and symbols marked with [`with_failure`](Self::with_failure)
/// fail every leg.
#[derive(Default)]
pub struct StaticMarketDataClient {
    snapshots: HashMap<String, MarketSnapshot>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl StaticMarketDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, snapshot: MarketSnapshot) -> Self {
        self.snapshots.insert(snapshot.symbol.clone(), snapshot);
        self
    }

    pub fn with_failure(mut self, symbol: impl Into<String>) -> Self {
        self.failing.insert(symbol.into());
        self
    }

    /// Delay every leg served for `symbol`
    pub fn with_delay(mut self, symbol: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(symbol.into(), delay);
        self
    }

    /// Number of snapshots requested, counted on the bar leg
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn pause(&self, symbol: &str) {
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
    }

    fn lookup(&self, symbol: &str) -> Result<&MarketSnapshot> {
        if self.failing.contains(symbol) {
            return Err(MarketDataError::Connection(format!("{} unavailable", symbol)));
        }
        self.snapshots
            .get(symbol)
            .ok_or_else(|| MarketDataError::DataNotAvailable(symbol.to_string()))
    }
}

#[async_trait]
impl MarketDataClient for StaticMarketDataClient {
    async fn latest_bar(&self, symbol: &str) -> Result<Option<PriceBar>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pause(symbol).await;
        Ok(self.lookup(symbol)?.latest_bar.clone())
    }

    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>> {
        self.pause(symbol).await;
        Ok(self.lookup(symbol)?.previous_close)
    }

    async fn news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsItem>> {
        self.pause(symbol).await;
        let news = &self.lookup(symbol)?.news;
        Ok(news.iter().take(limit as usize).cloned().collect())
    }
}
