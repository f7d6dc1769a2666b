use chrono::Utc;
use common::NewArticle;
use content::{placeholder, GeneratedContent, GenerationRequest};
use detector::{event_excerpt, event_title, BreakingNewsEvent};
use observability::PipelineMetrics;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};

use crate::error::{PipelineError, Result};
use crate::orchestrator::{ensure_live, stage, Orchestrator};
use crate::outcome::{BreakingArticle, BreakingReport, EventFailure, EventSummary, Stage};
use crate::slug::article_slug;

const BREAKING_TAGS: [&str; 2] = ["breaking-news", "market-update"];

impl Orchestrator {
    /// Scan the watchlist and publish an article for each top-ranked event
    ///
    /// Events are processed one at a time; a failed event is recorded in
    /// the report and the run moves on. Breaking articles ignore the daily cap.
    pub async fn run_breaking(&self, cancel: &CancellationToken) -> Result<BreakingReport> {
        let metrics = PipelineMetrics::new("breaking");
        let _timer = metrics.start_run();

        let result = self
            .breaking(&metrics, cancel)
            .instrument(info_span!("pipeline", kind = "breaking"))
            .await;

        match &result {
            Ok(report) => {
                info!(detected = report.detected, created = report.created, "Pipeline finished");
                metrics.record_outcome(report.label());
            }
            Err(e) => {
                warn!(error = %e, "Pipeline failed");
                metrics.record_outcome("failed");
            }
        }
        result
    }

    async fn breaking(&self, metrics: &PipelineMetrics, cancel: &CancellationToken) -> Result<BreakingReport> {
        stage(Stage::Selecting);
        let events = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            events = self.detector.detect(&self.settings.watchlist) => events,
        };
        metrics.record_breaking_events(events.len());
        info!(detected = events.len(), "Breaking events detected");

        let mut report = BreakingReport {
            ok: true,
            detected: events.len(),
            created: 0,
            events: events.iter().map(EventSummary::from).collect(),
            articles: Vec::new(),
            failures: Vec::new(),
        };

        for event in events.iter().take(self.settings.max_events_per_run) {
            match self.publish_event(event, metrics, cancel).await {
                Ok(article) => report.articles.push(article),
                Err(e) => {
                    error!(symbol = %event.symbol, error = %e, "Breaking article failed");
                    report.failures.push(EventFailure {
                        symbol: event.symbol.clone(),
                        error: e.to_string(),
                    });
                    if e == PipelineError::Cancelled {
                        break;
                    }
                }
            }
        }
        report.created = report.articles.len();

        stage(Stage::Reporting);
        Ok(report)
    }

    async fn publish_event(
        &self,
        event: &BreakingNewsEvent,
        metrics: &PipelineMetrics,
        cancel: &CancellationToken,
    ) -> Result<BreakingArticle> {
        let now = Utc::now();
        let title = event_title(event);
        let excerpt = event_excerpt(event);

        let request = GenerationRequest::Ticker {
            symbol: event.symbol.clone(),
            snapshot: event.market_data.clone(),
            is_breaking: true,
        };
        let (content, ai_generated) = self
            .generate_or_placeholder(&request, metrics, cancel, || {
                placeholder::breaking(&event.symbol, &title, &excerpt, &event.reason, now)
            })
            .await?;
        let content = with_event_templates(content, &request, &title, &excerpt);

        ensure_live(cancel)?;
        stage(Stage::Publishing);
        let article = NewArticle {
            slug: article_slug(Some("breaking"), Some(&event.symbol), now),
            title: content.title,
            excerpt: content.excerpt,
            body_markdown: content.body_markdown,
            tickers: vec![event.symbol.clone()],
            tags: BREAKING_TAGS.map(String::from).to_vec(),
            is_breaking: true,
            model: ai_generated.then_some(content.model),
            prompt_version: Some(content.prompt_version),
            market_snapshot: Some(event.market_data.clone()),
            source_news: Some(
                serde_json::to_value(&event.market_data.news)
                    .map_err(|e| PipelineError::Publish(e.to_string()))?,
            ),
            stock_score: Some(self.scorer.score(&event.market_data).score),
            published_at: now,
        };
        let stored = self.publisher.publish(article).await?;

        Ok(BreakingArticle {
            id: stored.id,
            slug: stored.content.slug,
            symbol: event.symbol.clone(),
            reason: event.reason.clone(),
            severity: event.severity,
            price_change: event.price_change,
            ai_generated,
        })
    }
}

/// Replace generic fallback title and excerpt with the event's templates
fn with_event_templates(
    mut content: GeneratedContent,
    request: &GenerationRequest,
    title: &str,
    excerpt: &str,
) -> GeneratedContent {
    if content.title.trim().is_empty() || content.title == request.fallback_title() {
        content.title = title.to_string();
    }
    if content.excerpt.trim().is_empty() || content.excerpt == request.fallback_excerpt() {
        content.excerpt = excerpt.to_string();
    }
    content
}
