use chrono::Utc;
use common::MarketSnapshot;
use futures::stream::{self, StreamExt};
use market_data::{fetch_snapshot, MarketDataClient, MarketDataError, DEFAULT_NEWS_LIMIT};
use observability::metrics::record_upstream_failure;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::rules::evaluate;
use crate::types::BreakingNewsEvent;

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Stand-in for a historical average volume
    pub baseline_volume: f64,
    /// Maximum snapshot fetches in flight
    pub concurrency: usize,
    /// Upper bound on one symbol's snapshot fetch
    pub fetch_timeout: Duration,
    /// Headlines requested per snapshot
    pub news_limit: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            baseline_volume: 1_000_000.0,
            concurrency: 5,
            fetch_timeout: Duration::from_secs(10),
            news_limit: DEFAULT_NEWS_LIMIT,
        }
    }
}

pub struct BreakingEventDetector {
    client: Arc<dyn MarketDataClient>,
    config: DetectorConfig,
}

impl BreakingEventDetector {
    pub fn new(client: Arc<dyn MarketDataClient>, config: DetectorConfig) -> Self {
        Self { client, config }
    }

    /// Scan `symbols` and return qualifying events, highest ranked first
    ///
    /// Each symbol is fetched once. Symbols whose snapshot cannot be fetched
    /// within `fetch_timeout` are skipped. Ties in rank are broken by symbol
    /// so the result does not depend on fetch order.
    #[instrument(skip_all, fields(symbols = symbols.len()))]
    pub async fn detect(&self, symbols: &[String]) -> Vec<BreakingNewsEvent> {
        let concurrency = self.config.concurrency.max(1);

        let mut seen = HashSet::new();
        let unique: Vec<&String> = symbols.iter().filter(|s| seen.insert(s.as_str())).collect();

        let fetches: Vec<_> = unique
            .into_iter()
            .map(|symbol| async move { (symbol, self.fetch(symbol).await) })
            .collect();

        let snapshots: Vec<_> = stream::iter(fetches)
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let detected_at = Utc::now();
        let mut events: Vec<BreakingNewsEvent> = snapshots
            .into_iter()
            .filter_map(|(symbol, result)| match result {
                Ok(snapshot) => evaluate(&snapshot, self.config.baseline_volume, detected_at),
                Err(error) => {
                    warn!(%symbol, %error, "Skipping symbol, snapshot unavailable");
                    None
                }
            })
            .collect();

        events.sort_by(|a, b| match b.rank().total_cmp(&a.rank()) {
            Ordering::Equal => a.symbol.cmp(&b.symbol),
            other => other,
        });

        for event in &events {
            debug!(symbol = %event.symbol, severity = event.severity.as_str(), rank = event.rank(), "Breaking event");
        }
        info!(detected = events.len(), "Breaking detection complete");
        events
    }

    async fn fetch(&self, symbol: &str) -> market_data::Result<MarketSnapshot> {
        let fetch = fetch_snapshot(&*self.client, symbol, self.config.news_limit);
        match tokio::time::timeout(self.config.fetch_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => {
                record_upstream_failure("market_data");
                Err(MarketDataError::Connection(format!(
                    "{} timed out after {:?}",
                    symbol, self.config.fetch_timeout
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use common::PriceBar;
    use market_data::StaticMarketDataClient;
    use std::time::Duration;

    fn snapshot(symbol: &str, change_pct: f64, volume: u64) -> MarketSnapshot {
        let close = 100.0 + change_pct;
        let bar = PriceBar::new(100.0, close.max(100.0), close.min(100.0), close, volume, Utc::now());
        MarketSnapshot::assemble(symbol, Some(bar), Some(100.0), vec![], Utc::now())
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn detector(client: StaticMarketDataClient, concurrency: usize) -> BreakingEventDetector {
        BreakingEventDetector::new(
            Arc::new(client),
            DetectorConfig {
                concurrency,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_ranked_by_severity_weighted_change() {
        let client = StaticMarketDataClient::new()
            .with_snapshot(snapshot("AAA", 6.0, 0)) // low: 1 × 6 = 6
            .with_snapshot(snapshot("BBB", -8.0, 0)) // medium: 2 × 8 = 16
            .with_snapshot(snapshot("CCC", 2.5, 4_000_000)) // medium spike: 2 × 2.5 = 5
            .with_snapshot(snapshot("DDD", 12.0, 0)) // high: 3 × 12 = 36
            .with_snapshot(snapshot("EEE", 0.5, 0));

        let events = detector(client, 3)
            .detect(&symbols(&["AAA", "BBB", "CCC", "DDD", "EEE"]))
            .await;

        let order: Vec<_> = events.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(order, vec!["DDD", "BBB", "AAA", "CCC"]);
        assert!(events.windows(2).all(|w| w[0].rank() >= w[1].rank()));
        assert_eq!(events[0].severity, Severity::High);
    }

    #[tokio::test]
    async fn test_failed_symbol_is_skipped() {
        let client = StaticMarketDataClient::new()
            .with_snapshot(snapshot("AAPL", -11.0, 6_000_000))
            .with_failure("MSFT");

        let events = detector(client, 2).detect(&symbols(&["MSFT", "AAPL", "GOOGL"])).await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].symbol, "AAPL");
        assert!(events[0].reason.contains("Plunged"));
    }

    #[tokio::test]
    async fn test_order_independent_of_fetch_completion() {
        let build = |slow: &str| {
            StaticMarketDataClient::new()
                .with_snapshot(snapshot("AAA", 6.0, 0))
                .with_snapshot(snapshot("BBB", 6.0, 0))
                .with_snapshot(snapshot("CCC", 9.0, 0))
                .with_delay(slow, Duration::from_millis(30))
        };
        let list = symbols(&["AAA", "BBB", "CCC"]);

        let first = detector(build("AAA"), 3).detect(&list).await;
        let second = detector(build("CCC"), 3).detect(&list).await;

        let names = |events: &[BreakingNewsEvent]| {
            events.iter().map(|e| e.symbol.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), vec!["CCC", "AAA", "BBB"]);
        assert_eq!(names(&first), names(&second));
    }

    #[tokio::test]
    async fn test_one_event_per_symbol() {
        let client = Arc::new(
            StaticMarketDataClient::new().with_snapshot(snapshot("TSLA", 15.0, 8_000_000)),
        );
        let detector = BreakingEventDetector::new(client.clone(), DetectorConfig::default());

        let events = detector.detect(&symbols(&["TSLA", "TSLA"])).await;
        assert_eq!(events.len(), 1);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_slow_symbol_skipped_after_fetch_timeout() {
        let client = StaticMarketDataClient::new()
            .with_snapshot(snapshot("SLOW", 12.0, 0))
            .with_snapshot(snapshot("FAST", 8.0, 0))
            .with_delay("SLOW", Duration::from_millis(1500));
        let detector = BreakingEventDetector::new(
            Arc::new(client),
            DetectorConfig {
                fetch_timeout: Duration::from_millis(50),
                ..Default::default()
            },
        );

        let started = std::time::Instant::now();
        let events = detector.detect(&symbols(&["SLOW", "FAST"])).await;

        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].symbol, "FAST");
    }

    #[tokio::test]
    async fn test_news_limit_applied_to_snapshots() {
        let news = (0..8).map(|i| common::NewsItem::headline(format!("Headline {}", i))).collect();
        let bar = PriceBar::new(100.0, 112.0, 100.0, 112.0, 0, Utc::now());
        let client = StaticMarketDataClient::new().with_snapshot(MarketSnapshot::assemble(
            "NVDA",
            Some(bar),
            Some(100.0),
            news,
            Utc::now(),
        ));
        let detector = BreakingEventDetector::new(
            Arc::new(client),
            DetectorConfig {
                news_limit: 2,
                ..Default::default()
            },
        );

        let events = detector.detect(&symbols(&["NVDA"])).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].market_data.news.len(), 2);
    }
}
