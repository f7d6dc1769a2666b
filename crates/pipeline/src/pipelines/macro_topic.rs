use chrono::Utc;
use common::{ArticleRef, NewArticle};
use content::{placeholder, GenerationRequest, MacroTopic};
use observability::PipelineMetrics;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use super::routine::report;
use super::MacroRequest;
use crate::error::Result;
use crate::orchestrator::{ensure_live, stage, Orchestrator};
use crate::outcome::{MacroArticle, Outcome, Stage};
use crate::slug::article_slug;

impl Orchestrator {
    /// Publish one macro-economic article; a random topic when none is given
    pub async fn run_macro(&self, request: MacroRequest, cancel: &CancellationToken) -> Result<Outcome<MacroArticle>> {
        let metrics = PipelineMetrics::new("macro");
        let _timer = metrics.start_run();

        let result = self
            .macro_topic(request, &metrics, cancel)
            .instrument(info_span!("pipeline", kind = "macro"))
            .await;
        report(&metrics, &result);
        result
    }

    async fn macro_topic(
        &self,
        request: MacroRequest,
        metrics: &PipelineMetrics,
        cancel: &CancellationToken,
    ) -> Result<Outcome<MacroArticle>> {
        let topic = match request.topic.as_deref() {
            Some(raw) => raw.parse::<MacroTopic>()?,
            None => MacroTopic::random(),
        };
        self.require_generator()?;

        stage(Stage::Selecting);
        info!(topic = %topic, "Selected macro topic");

        let now = Utc::now();
        let generation = GenerationRequest::Macro { topic };
        let (content, ai_generated) = self
            .generate_or_placeholder(&generation, metrics, cancel, || {
                placeholder::macro_topic(topic, now)
            })
            .await?;

        ensure_live(cancel)?;
        stage(Stage::Publishing);
        let article = NewArticle {
            slug: article_slug(Some("macro"), Some(topic.as_str()), now),
            title: content.title,
            excerpt: content.excerpt,
            body_markdown: content.body_markdown,
            tickers: Vec::new(),
            tags: content.tags,
            is_breaking: false,
            model: ai_generated.then_some(content.model),
            prompt_version: Some(content.prompt_version),
            market_snapshot: None,
            source_news: None,
            stock_score: None,
            published_at: now,
        };
        let stored = self.publisher.publish(article).await?;

        stage(Stage::Reporting);
        Ok(Outcome::Created(MacroArticle {
            article: ArticleRef::from(&stored),
            topic,
            ai_generated,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::pipelines::tests::{fixture, Fixture};
    use assert_matches::assert_matches;
    use content::{ContentError, MockContentGenerator};
    use scheduler::TickerScheduler;

    #[tokio::test]
    async fn test_macro_with_topic() {
        let Fixture { orchestrator, store, .. } = fixture(|_| {});

        let outcome = orchestrator
            .run_macro(MacroRequest { topic: Some("inflation".into()) }, &CancellationToken::new())
            .await
            .unwrap();
        let created = outcome.created().unwrap();

        assert_eq!(created.topic, MacroTopic::Inflation);
        assert!(created.article.slug.starts_with("macro-inflation-"));
        assert!(!created.article.is_breaking);

        // macro articles count toward the routine quota
        let scheduler = TickerScheduler::new(store.clone(), store.clone());
        assert_eq!(scheduler.daily_routine_count(Utc::now()).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_macro_random_topic() {
        let Fixture { orchestrator, .. } = fixture(|_| {});

        let outcome = orchestrator
            .run_macro(MacroRequest::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(MacroTopic::ALL.contains(&outcome.created().unwrap().topic));
    }

    #[tokio::test]
    async fn test_unknown_topic_is_invalid_request() {
        let Fixture { orchestrator, generator, .. } = fixture(|_| {});

        let err = orchestrator
            .run_macro(MacroRequest { topic: Some("weather".into()) }, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::InvalidRequest(_));
        assert_eq!(err.status_code(), 400);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_macro_generation_failure_placeholder() {
        let Fixture { orchestrator, .. } =
            Fixture::with_generator(MockContentGenerator::failing(ContentError::EmptyResponse));

        let outcome = orchestrator
            .run_macro(MacroRequest { topic: Some("gdp".into()) }, &CancellationToken::new())
            .await
            .unwrap();
        let created = outcome.created().unwrap();
        assert!(!created.ai_generated);
        assert!(created.article.title.starts_with("GDP and Economic Growth Outlook"));
    }

    #[tokio::test]
    async fn test_macro_requires_generator_key() {
        let Fixture { orchestrator, .. } = Fixture::with_generator(MockContentGenerator::unconfigured());

        let err = orchestrator
            .run_macro(MacroRequest::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Configuration(_));
    }
}
