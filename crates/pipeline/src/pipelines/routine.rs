use chrono::Utc;
use common::{normalize_symbol, ArticleRef, NewArticle};
use content::{placeholder, GenerationRequest};
use observability::PipelineMetrics;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use super::RoutineRequest;
use crate::error::{PipelineError, Result};
use crate::orchestrator::{ensure_live, stage, Orchestrator};
use crate::outcome::{Outcome, RoutineArticle, Skipped, Stage};
use crate::slug::article_slug;

impl Orchestrator {
    /// Publish one routine article, subject to the daily cap
    ///
    /// `symbol` bypasses ticker selection; `is_breaking` bypasses the cap.
    pub async fn run_routine(
        &self,
        request: RoutineRequest,
        cancel: &CancellationToken,
    ) -> Result<Outcome<RoutineArticle>> {
        let metrics = PipelineMetrics::new("routine");
        let _timer = metrics.start_run();

        let result = self
            .routine(request, &metrics, cancel)
            .instrument(info_span!("pipeline", kind = "routine"))
            .await;
        report(&metrics, &result);
        result
    }

    async fn routine(
        &self,
        request: RoutineRequest,
        metrics: &PipelineMetrics,
        cancel: &CancellationToken,
    ) -> Result<Outcome<RoutineArticle>> {
        let now = Utc::now();
        let is_breaking = request.is_breaking.unwrap_or(false);
        let requested = request.symbol.as_deref().map(normalize_symbol).transpose()?;

        stage(Stage::Selecting);
        if !is_breaking {
            let cap = self.settings.daily_cap;
            let daily = self.scheduler.daily_routine_count(now).await?;
            info!(count = daily.count, cap, "Routine articles published today");
            if daily.reached(cap) {
                return Ok(Outcome::Skipped(Skipped::daily_cap(cap, daily)));
            }
        }

        let symbol = match requested {
            Some(symbol) => symbol,
            None => match self.scheduler.pick_next().await? {
                Some(ticker) => ticker.symbol,
                None => return Ok(Outcome::Skipped(Skipped::new("No active tickers found"))),
            },
        };
        info!(symbol = %symbol, is_breaking, "Selected symbol");

        stage(Stage::Fetching);
        let (snapshot, has_data) = self.snapshot_or_empty(&symbol, now, cancel).await?;
        let stock_score = has_data.then(|| self.scorer.score(&snapshot).score);

        let generation = GenerationRequest::Ticker {
            symbol: symbol.clone(),
            snapshot: snapshot.clone(),
            is_breaking,
        };
        let (content, ai_generated) = self
            .generate_or_placeholder(&generation, metrics, cancel, || {
                placeholder::ticker(&symbol, now, is_breaking)
            })
            .await?;

        ensure_live(cancel)?;
        stage(Stage::Publishing);
        let source_news = if has_data {
            Some(serde_json::to_value(&snapshot.news).map_err(|e| PipelineError::Publish(e.to_string()))?)
        } else {
            None
        };
        let article = NewArticle {
            slug: article_slug(None, Some(&symbol), now),
            title: content.title,
            excerpt: content.excerpt,
            body_markdown: content.body_markdown,
            tickers: vec![symbol.clone()],
            tags: content.tags,
            is_breaking,
            model: ai_generated.then_some(content.model),
            prompt_version: Some(content.prompt_version),
            market_snapshot: has_data.then_some(snapshot),
            source_news,
            stock_score,
            published_at: now,
        };
        let stored = self.publisher.publish(article).await?;

        stage(Stage::Reporting);
        Ok(Outcome::Created(RoutineArticle {
            article: ArticleRef::from(&stored),
            ai_generated,
            stock_score,
        }))
    }
}

pub(crate) fn report<T>(metrics: &PipelineMetrics, result: &Result<Outcome<T>>) {
    match result {
        Ok(outcome) => {
            info!(pipeline = metrics.pipeline(), outcome = outcome.label(), "Pipeline finished");
            metrics.record_outcome(outcome.label());
        }
        Err(e) => {
            warn!(pipeline = metrics.pipeline(), error = %e, "Pipeline failed");
            metrics.record_outcome("failed");
        }
    }
}
