use chrono::{DateTime, Utc};
use common::MarketSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Ranking multiplier applied to the absolute price change
    pub fn weight(&self) -> f64 {
        match self {
            Self::High => 3.0,
            Self::Medium => 2.0,
            Self::Low => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A symbol that crossed a move or volume threshold in one detection run
///
/// Consumed by the breaking pipeline; only the resulting article is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingNewsEvent {
    pub symbol: String,
    pub reason: String,
    pub severity: Severity,
    /// Session change in percent
    pub price_change: f64,
    /// Volume as a multiple of the baseline, for volume-spike events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_change: Option<f64>,
    pub detected_at: DateTime<Utc>,
    pub market_data: MarketSnapshot,
}

impl BreakingNewsEvent {
    /// `severity weight × |price change|`, the ranking key
    pub fn rank(&self) -> f64 {
        self.severity.weight() * self.price_change.abs()
    }
}
