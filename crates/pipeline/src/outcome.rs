//! Pipeline run states and reports

use common::ArticleRef;
use content::MacroTopic;
use detector::{BreakingNewsEvent, Severity};
use scheduler::DailyCount;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Steps of a pipeline run, logged as the run advances
///
/// Cache invalidation is part of publishing and is logged by the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticating,
    Selecting,
    Fetching,
    Generating,
    Publishing,
    Reporting,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Authenticating => "authenticating",
            Stage::Selecting => "selecting",
            Stage::Fetching => "fetching",
            Stage::Generating => "generating",
            Stage::Publishing => "publishing",
            Stage::Reporting => "reporting",
        }
    }
}

/// Why a run ended without creating anything
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skipped {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<u32>,
    #[serde(flatten)]
    pub daily: Option<DailyCount>,
}

impl Skipped {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            cap: None,
            daily: None,
        }
    }

    pub fn daily_cap(cap: u32, daily: DailyCount) -> Self {
        Self {
            reason: "Daily cap reached".to_string(),
            cap: Some(cap),
            daily: Some(daily),
        }
    }
}

/// Successful terminal state of a run
///
/// Failures are reported through [`PipelineError`](crate::PipelineError).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Created(T),
    Skipped(Skipped),
}

impl<T> Outcome<T> {
    /// Metric label for this outcome
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Created(_) => "created",
            Outcome::Skipped(_) => "skipped",
        }
    }

    pub fn created(&self) -> Option<&T> {
        match self {
            Outcome::Created(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }
}

#[derive(Serialize)]
struct CreatedBody<'a, T> {
    ok: bool,
    created: bool,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct SkippedBody<'a> {
    ok: bool,
    created: bool,
    skipped: bool,
    #[serde(flatten)]
    skip: &'a Skipped,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Created(body) => CreatedBody {
                ok: true,
                created: true,
                body,
            }
            .serialize(serializer),
            Outcome::Skipped(skip) => SkippedBody {
                ok: true,
                created: false,
                skipped: true,
                skip,
            }
            .serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineArticle {
    pub article: ArticleRef,
    pub ai_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldNewsArticle {
    pub article: ArticleRef,
    pub ai_generated: bool,
    pub sources_used: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroArticle {
    pub article: ArticleRef,
    pub topic: MacroTopic,
    pub ai_generated: bool,
}

/// A detected event as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub symbol: String,
    pub reason: String,
    pub severity: Severity,
    pub price_change: f64,
}

impl From<&BreakingNewsEvent> for EventSummary {
    fn from(event: &BreakingNewsEvent) -> Self {
        Self {
            symbol: event.symbol.clone(),
            reason: event.reason.clone(),
            severity: event.severity,
            price_change: event.price_change,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingArticle {
    pub id: Uuid,
    pub slug: String,
    pub symbol: String,
    pub reason: String,
    pub severity: Severity,
    pub price_change: f64,
    pub ai_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFailure {
    pub symbol: String,
    pub error: String,
}

/// Result of one breaking-news run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingReport {
    pub ok: bool,
    pub detected: usize,
    pub created: usize,
    pub events: Vec<EventSummary>,
    pub articles: Vec<BreakingArticle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<EventFailure>,
}

impl BreakingReport {
    pub fn label(&self) -> &'static str {
        if self.created > 0 {
            "created"
        } else {
            "skipped"
        }
    }
}
