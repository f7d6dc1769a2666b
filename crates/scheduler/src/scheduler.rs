use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Ticker, UtcDayWindow};
use serde::Serialize;
use storage::{ArticleStore, Result, TickerStore};
use tracing::debug;

/// Routine articles published in one UTC day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub count: u64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

impl DailyCount {
    /// True once `count` has reached `cap`
    pub fn reached(&self, cap: u32) -> bool {
        self.count >= u64::from(cap)
    }
}

/// Coverage order: priority desc, never-covered first, oldest coverage first, symbol asc
pub fn order_for_coverage(a: &Ticker, b: &Ticker) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| match (a.last_article_at, b.last_article_at) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y),
        })
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Selects tickers for routine coverage
pub struct TickerScheduler {
    tickers: Arc<dyn TickerStore>,
    articles: Arc<dyn ArticleStore>,
}

impl TickerScheduler {
    pub fn new(tickers: Arc<dyn TickerStore>, articles: Arc<dyn ArticleStore>) -> Self {
        Self { tickers, articles }
    }

    /// The active ticker that should be covered next, if any
    pub async fn pick_next(&self) -> Result<Option<Ticker>> {
        let active = self.tickers.list_active_tickers().await?;
        let next = active.into_iter().min_by(order_for_coverage);

        debug!(symbol = next.as_ref().map(|t| t.symbol.as_str()), "Picked next ticker");
        Ok(next)
    }

    /// Stamp a ticker as covered at `published_at`
    ///
    /// Unknown symbols are ignored.
    pub async fn record_published(&self, symbol: &str, published_at: DateTime<Utc>) -> Result<()> {
        let updated = self.tickers.set_last_article_at(symbol, published_at).await?;
        if !updated {
            debug!(symbol, "Published symbol is not a tracked ticker");
        }
        Ok(())
    }

    /// Non-breaking articles published in the UTC day containing `now`
    pub async fn daily_routine_count(&self, now: DateTime<Utc>) -> Result<DailyCount> {
        let window = UtcDayWindow::containing(now);
        let count = self.articles.count_routine_published(window).await?;

        Ok(DailyCount {
            count,
            window_start: window.start,
            window_end: window.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use common::NewArticle;
    use storage::InMemoryContentStore;

    fn scheduler(store: Arc<InMemoryContentStore>) -> TickerScheduler {
        TickerScheduler::new(store.clone(), store)
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_pick_next_prefers_priority() {
        let store = Arc::new(InMemoryContentStore::with_tickers([
            Ticker::new("AAPL", 1),
            Ticker::new("NVDA", 5).covered_at(at(10)),
        ]));

        let next = scheduler(store).pick_next().await.unwrap().unwrap();
        assert_eq!(next.symbol, "NVDA");
    }

    #[tokio::test]
    async fn test_pick_next_never_covered_first() {
        let store = Arc::new(InMemoryContentStore::with_tickers([
            Ticker::new("AAPL", 1).covered_at(at(1)),
            Ticker::new("MSFT", 1),
        ]));

        let next = scheduler(store).pick_next().await.unwrap().unwrap();
        assert_eq!(next.symbol, "MSFT");
    }

    #[tokio::test]
    async fn test_pick_next_oldest_then_symbol() {
        let store = Arc::new(InMemoryContentStore::with_tickers([
            Ticker::new("TSLA", 0).covered_at(at(9)),
            Ticker::new("META", 0).covered_at(at(3)),
            Ticker::new("AMZN", 0).covered_at(at(3)),
        ]));

        let next = scheduler(store).pick_next().await.unwrap().unwrap();
        assert_eq!(next.symbol, "AMZN");
    }

    #[tokio::test]
    async fn test_pick_next_is_deterministic() {
        let store = Arc::new(InMemoryContentStore::with_tickers([
            Ticker::new("KO", 2),
            Ticker::new("PEP", 2),
            Ticker::new("PG", 2),
        ]));
        let scheduler = scheduler(store);

        let first = scheduler.pick_next().await.unwrap();
        for _ in 0..10 {
            assert_eq!(scheduler.pick_next().await.unwrap(), first);
        }
        assert_eq!(first.unwrap().symbol, "KO");
    }

    #[tokio::test]
    async fn test_pick_next_ignores_inactive() {
        let store = Arc::new(InMemoryContentStore::with_tickers([
            Ticker::new("AAPL", 9).inactive(),
        ]));

        assert!(scheduler(store).pick_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_published_rotates() {
        let store = Arc::new(InMemoryContentStore::with_tickers([
            Ticker::new("AAPL", 0),
            Ticker::new("MSFT", 0),
        ]));
        let scheduler = scheduler(store.clone());

        let first = scheduler.pick_next().await.unwrap().unwrap();
        assert_eq!(first.symbol, "AAPL");

        scheduler.record_published("AAPL", at(12)).await.unwrap();
        let second = scheduler.pick_next().await.unwrap().unwrap();
        assert_eq!(second.symbol, "MSFT");
    }

    #[tokio::test]
    async fn test_record_published_idempotent() {
        let store = Arc::new(InMemoryContentStore::with_tickers([Ticker::new("AAPL", 0)]));
        let scheduler = scheduler(store.clone());

        scheduler.record_published("AAPL", at(12)).await.unwrap();
        let once = store.get_ticker("AAPL").await.unwrap();
        scheduler.record_published("AAPL", at(12)).await.unwrap();
        let twice = store.get_ticker("AAPL").await.unwrap();

        assert_eq!(once, twice);
        scheduler.record_published("ZZZZ", at(12)).await.unwrap();
    }

    #[tokio::test]
    async fn test_daily_routine_count() {
        let store = Arc::new(InMemoryContentStore::new());
        let now = at(15);
        for (i, (breaking, published)) in [
            (false, at(1)),
            (false, at(14)),
            (true, at(14)),
            (false, at(0) - Duration::minutes(1)),
        ]
        .into_iter()
        .enumerate()
        {
            store
                .insert_article(NewArticle {
                    slug: format!("slug-{i}"),
                    title: "t".into(),
                    excerpt: "e".into(),
                    body_markdown: "b".into(),
                    tickers: vec![],
                    tags: vec![],
                    is_breaking: breaking,
                    model: None,
                    prompt_version: None,
                    market_snapshot: None,
                    source_news: None,
                    stock_score: None,
                    published_at: published,
                })
                .await
                .unwrap();
        }

        let daily = scheduler(store).daily_routine_count(now).await.unwrap();
        assert_eq!(daily.count, 2);
        assert_eq!(daily.window_start, at(0));
        assert_eq!(daily.window_end, at(0) + Duration::days(1));
        assert!(daily.reached(2));
        assert!(!daily.reached(3));
    }

    #[test]
    fn test_daily_count_serializes_camel_case() {
        let daily = DailyCount {
            count: 3,
            window_start: at(0),
            window_end: at(0) + Duration::days(1),
        };
        let json = serde_json::to_value(daily).unwrap();
        assert!(json.get("windowStart").is_some());
        assert!(json.get("windowEnd").is_some());
    }
}
