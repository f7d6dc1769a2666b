//! Article publishing

use std::sync::Arc;

use common::{Article, NewArticle};
use scheduler::TickerScheduler;
use storage::ArticleStore;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::invalidate::{invalidation_paths, CacheInvalidator};

/// Persists articles, stamps ticker coverage and invalidates caches
///
/// Only the insert can fail a publish. Bookkeeping and invalidation
/// failures are logged after the article is already stored.
pub struct ArticlePublisher {
    articles: Arc<dyn ArticleStore>,
    scheduler: Arc<TickerScheduler>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl ArticlePublisher {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        scheduler: Arc<TickerScheduler>,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            articles,
            scheduler,
            invalidator,
        }
    }

    pub async fn publish(&self, article: NewArticle) -> Result<Article> {
        let stored = self.articles.insert_article(article).await?;
        info!(slug = stored.slug(), is_breaking = stored.is_breaking(), "Article published");

        for symbol in &stored.content.tickers {
            if let Err(e) = self
                .scheduler
                .record_published(symbol, stored.published_at())
                .await
            {
                warn!(symbol = %symbol, error = %e, "Failed to record ticker coverage");
            }
        }

        let paths = invalidation_paths(stored.content.tickers.first().map(String::as_str));
        debug!(?paths, "Invalidating caches");
        if let Err(e) = self.invalidator.invalidate(&paths).await {
            warn!(error = %e, "Cache invalidation failed");
        }

        Ok(stored)
    }
}
