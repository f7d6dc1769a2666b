//! Store traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Article, NewArticle, Ticker, UtcDayWindow};

use crate::error::Result;

/// Tracked tickers eligible for routine coverage
#[async_trait]
pub trait TickerStore: Send + Sync {
    /// All tickers with `is_active = true`, in no particular order
    async fn list_active_tickers(&self) -> Result<Vec<Ticker>>;

    /// Get one ticker by symbol
    async fn get_ticker(&self, symbol: &str) -> Result<Option<Ticker>>;

    /// Insert or replace a ticker keyed by symbol
    async fn upsert_ticker(&self, ticker: Ticker) -> Result<()>;

    /// Stamp the ticker's coverage time
    ///
    /// Returns false (and changes nothing) when the symbol is not tracked.
    async fn set_last_article_at(&self, symbol: &str, at: DateTime<Utc>) -> Result<bool>;

    /// Insert each ticker whose symbol is not already present
    ///
    /// Returns how many were inserted.
    async fn seed_tickers(&self, tickers: Vec<Ticker>) -> Result<usize> {
        let mut inserted = 0;
        for ticker in tickers {
            if self.get_ticker(&ticker.symbol).await?.is_none() {
                self.upsert_ticker(ticker).await?;
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

/// Published articles
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Persist an article
    ///
    /// Fails with [`StorageError::DuplicateSlug`](crate::StorageError::DuplicateSlug)
    /// when the slug is taken.
    async fn insert_article(&self, article: NewArticle) -> Result<Article>;

    /// Look up an article by slug
    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// Number of non-breaking articles published inside `window`
    async fn count_routine_published(&self, window: UtcDayWindow) -> Result<u64>;
}

/// Both stores behind one handle
pub trait ContentStore: TickerStore + ArticleStore {}

impl<T: TickerStore + ArticleStore> ContentStore for T {}
