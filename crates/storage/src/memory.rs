//! In-memory content store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Article, NewArticle, Ticker, UtcDayWindow};
use parking_lot::RwLock;

use crate::error::{Result, StorageError};
use crate::traits::{ArticleStore, TickerStore};

/// In-memory ticker and article store
///
/// Articles are kept in insertion order; slugs are unique.
#[derive(Default)]
pub struct InMemoryContentStore {
    tickers: RwLock<HashMap<String, Ticker>>,
    articles: RwLock<Vec<Article>>,
    fail_writes: AtomicBool,
}

impl InMemoryContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with tickers
    pub fn with_tickers(tickers: impl IntoIterator<Item = Ticker>) -> Self {
        let store = Self::default();
        {
            let mut map = store.tickers.write();
            for ticker in tickers {
                map.insert(ticker.symbol.clone(), ticker);
            }
        }
        store
    }

    /// Make every subsequent write fail with a query error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every stored article
    pub fn articles(&self) -> Vec<Article> {
        self.articles.read().clone()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StorageError::Query("writes disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TickerStore for InMemoryContentStore {
    async fn list_active_tickers(&self) -> Result<Vec<Ticker>> {
        Ok(self
            .tickers
            .read()
            .values()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }

    async fn get_ticker(&self, symbol: &str) -> Result<Option<Ticker>> {
        Ok(self.tickers.read().get(symbol).cloned())
    }

    async fn upsert_ticker(&self, ticker: Ticker) -> Result<()> {
        self.check_writable()?;
        self.tickers.write().insert(ticker.symbol.clone(), ticker);
        Ok(())
    }

    async fn set_last_article_at(&self, symbol: &str, at: DateTime<Utc>) -> Result<bool> {
        self.check_writable()?;
        match self.tickers.write().get_mut(symbol) {
            Some(ticker) => {
                ticker.last_article_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ArticleStore for InMemoryContentStore {
    async fn insert_article(&self, article: NewArticle) -> Result<Article> {
        self.check_writable()?;
        let mut articles = self.articles.write();
        if articles.iter().any(|a| a.slug() == article.slug) {
            return Err(StorageError::DuplicateSlug(article.slug));
        }

        let stored = Article::from_new(article, Utc::now());
        articles.push(stored.clone());
        Ok(stored)
    }

    async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        Ok(self
            .articles
            .read()
            .iter()
            .find(|a| a.slug() == slug)
            .cloned())
    }

    async fn count_routine_published(&self, window: UtcDayWindow) -> Result<u64> {
        Ok(self
            .articles
            .read()
            .iter()
            .filter(|a| !a.is_breaking() && window.contains(a.published_at()))
            .count() as u64)
    }
}
