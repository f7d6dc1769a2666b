use chrono::Utc;
use common::{ArticleRef, NewArticle};
use content::{placeholder, GenerationRequest};
use market_data::gather_world_news;
use observability::PipelineMetrics;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use super::routine::report;
use crate::error::{PipelineError, Result};
use crate::orchestrator::{ensure_live, guarded, stage, Interrupted, Orchestrator};
use crate::outcome::{Outcome, Skipped, Stage, WorldNewsArticle};
use crate::slug::article_slug;

/// Source items stored with a world-news article
const MAX_STORED_SOURCES: usize = 5;

impl Orchestrator {
    /// Publish one digest article synthesized from current world headlines
    pub async fn run_world_news(&self, cancel: &CancellationToken) -> Result<Outcome<WorldNewsArticle>> {
        let metrics = PipelineMetrics::new("world_news");
        let _timer = metrics.start_run();

        let result = self
            .world_news(&metrics, cancel)
            .instrument(info_span!("pipeline", kind = "world_news"))
            .await;
        report(&metrics, &result);
        result
    }

    async fn world_news(
        &self,
        metrics: &PipelineMetrics,
        cancel: &CancellationToken,
    ) -> Result<Outcome<WorldNewsArticle>> {
        if !self.world.is_configured() {
            return Err(PipelineError::Configuration("NEWS_API_KEY is not configured".to_string()));
        }
        self.require_generator()?;

        stage(Stage::Fetching);
        let gather = gather_world_news(
            &*self.world,
            self.settings.world_page_size,
            self.settings.world_max_articles,
        );
        let items = match guarded(cancel, self.settings.fetch_timeout, gather).await {
            Ok(items) => items,
            Err(Interrupted::TimedOut) => {
                observability::metrics::record_upstream_failure("world_news");
                warn!("World news fetch timed out");
                Vec::new()
            }
            Err(Interrupted::Cancelled) => return Err(PipelineError::Cancelled),
        };

        if items.is_empty() {
            return Ok(Outcome::Skipped(Skipped::new("No news articles found")));
        }
        info!(sources = items.len(), "World news gathered");

        let now = Utc::now();
        let request = GenerationRequest::WorldNews { items: items.clone() };
        let (content, ai_generated) = self
            .generate_or_placeholder(&request, metrics, cancel, || {
                placeholder::world_news(&items, now)
            })
            .await?;

        ensure_live(cancel)?;
        stage(Stage::Publishing);
        let stored_sources = &items[..items.len().min(MAX_STORED_SOURCES)];
        let article = NewArticle {
            slug: article_slug(Some("world-news"), None, now),
            title: content.title,
            excerpt: content.excerpt,
            body_markdown: content.body_markdown,
            tickers: Vec::new(),
            tags: content.tags,
            is_breaking: true,
            model: ai_generated.then_some(content.model),
            prompt_version: Some(content.prompt_version),
            market_snapshot: None,
            source_news: Some(
                serde_json::to_value(stored_sources).map_err(|e| PipelineError::Publish(e.to_string()))?,
            ),
            stock_score: None,
            published_at: now,
        };
        let stored = self.publisher.publish(article).await?;

        stage(Stage::Reporting);
        Ok(Outcome::Created(WorldNewsArticle {
            article: ArticleRef::from(&stored),
            ai_generated,
            sources_used: items.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::tests::{default_store, fixture, market, world_item, Fixture};
    use assert_matches::assert_matches;
    use content::{ContentError, MockContentGenerator};
    use market_data::{NewsCategory, StaticWorldNewsClient};
    use std::sync::Arc;
    use storage::ArticleStore;

    #[tokio::test]
    async fn test_world_news_dedups_and_publishes() {
        let Fixture { orchestrator, store, generator, invalidator } = fixture(|_| {});

        let outcome = orchestrator.run_world_news(&CancellationToken::new()).await.unwrap();
        let created = outcome.created().unwrap();

        // "Storm nears coast" appears in two categories
        assert_eq!(created.sources_used, 3);
        assert!(created.ai_generated);
        assert!(created.article.slug.starts_with("world-news-"));
        assert!(created.article.is_breaking);

        let stored = store.get_article_by_slug(&created.article.slug).await.unwrap().unwrap();
        assert!(stored.content.tickers.is_empty());
        assert_eq!(stored.content.source_news.as_ref().unwrap().as_array().unwrap().len(), 3);
        assert_matches!(&generator.requests()[0], GenerationRequest::WorldNews { items } if items.len() == 3);
        assert_eq!(invalidator.calls(), vec![vec!["/", "/news"]]);
    }

    #[tokio::test]
    async fn test_stored_sources_capped_at_five() {
        let headlines: Vec<_> = (0..8).map(|i| world_item(&format!("Breaking: story {i}"))).collect();
        let world = StaticWorldNewsClient::new().with_headlines(NewsCategory::General, headlines);
        let fixture = Fixture::build_with(
            default_store(),
            MockContentGenerator::succeeding(),
            Arc::new(market()),
            Arc::new(world),
            |s| s.world_page_size = 10,
        );

        let outcome = fixture.orchestrator.run_world_news(&CancellationToken::new()).await.unwrap();
        let created = outcome.created().unwrap();
        assert_eq!(created.sources_used, 8);

        let stored = fixture.store.get_article_by_slug(&created.article.slug).await.unwrap().unwrap();
        assert_eq!(stored.content.source_news.unwrap().as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_no_news_skips() {
        let fixture = Fixture::build_with(
            default_store(),
            MockContentGenerator::succeeding(),
            Arc::new(market()),
            Arc::new(StaticWorldNewsClient::new()),
            |_| {},
        );

        let outcome = fixture.orchestrator.run_world_news(&CancellationToken::new()).await.unwrap();
        assert_matches!(outcome, Outcome::Skipped(skip) if skip.reason == "No news articles found");
        assert_eq!(fixture.generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_keys_are_configuration_errors() {
        let no_news = Fixture::build_with(
            default_store(),
            MockContentGenerator::succeeding(),
            Arc::new(market()),
            Arc::new(StaticWorldNewsClient::new().unconfigured()),
            |_| {},
        );
        let err = no_news.orchestrator.run_world_news(&CancellationToken::new()).await.unwrap_err();
        assert_matches!(err, PipelineError::Configuration(msg) if msg.contains("NEWS_API_KEY"));

        let no_ai = Fixture::with_generator(MockContentGenerator::unconfigured());
        let err = no_ai.orchestrator.run_world_news(&CancellationToken::new()).await.unwrap_err();
        assert_matches!(err, PipelineError::Configuration(msg) if msg.contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_generation_failure_publishes_digest() {
        let Fixture { orchestrator, store, .. } =
            Fixture::with_generator(MockContentGenerator::failing(ContentError::EmptyResponse));

        let outcome = orchestrator.run_world_news(&CancellationToken::new()).await.unwrap();
        let created = outcome.created().unwrap();
        assert!(!created.ai_generated);

        let stored = store.get_article_by_slug(&created.article.slug).await.unwrap().unwrap();
        assert!(stored.content.title.starts_with("World News Roundup"));
        assert!(stored.content.body_markdown.contains("Stocks climb"));
    }
}
