use serde::{Deserialize, Serialize};

/// Direction of one indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Neutral,
    Bearish,
}

impl Signal {
    /// +1, 0 or -1
    pub fn direction(&self) -> i32 {
        match self {
            Self::Bullish => 1,
            Self::Neutral => 0,
            Self::Bearish => -1,
        }
    }
}

/// One classified indicator with its fixed weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalResult {
    pub name: String,
    pub signal: Signal,
    pub weight: u32,
    pub description: String,
}

impl SignalResult {
    pub(crate) fn new(name: &str, weight: u32, signal: Signal, description: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            signal,
            weight,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Buy,
    Hold,
    Sell,
}

impl Rating {
    /// Buy at 30 and above, sell at -30 and below
    pub fn from_score(score: i32) -> Self {
        if score >= 30 {
            Self::Buy
        } else if score <= -30 {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Hold => "hold",
            Self::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// High when four or more signals agree on a direction, medium at three
    pub fn from_agreement(bullish: usize, bearish: usize) -> Self {
        let agreeing = bullish.max(bearish);
        if agreeing >= 4 {
            Self::High
        } else if agreeing >= 3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Aggregate rating derived from a snapshot
///
/// Always recomputed on demand; never stored as authoritative state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockScore {
    pub overall: Rating,
    /// Weighted score in `[-100, 100]`
    pub score: i32,
    pub confidence: Confidence,
    /// Momentum, volume, news sentiment, price range, trend, in that order
    pub signals: Vec<SignalResult>,
    pub summary: String,
}

impl StockScore {
    pub fn count(&self, signal: Signal) -> usize {
        self.signals.iter().filter(|s| s.signal == signal).count()
    }

    pub(crate) fn names_with(&self, signal: Signal) -> Vec<&str> {
        self.signals
            .iter()
            .filter(|s| s.signal == signal)
            .map(|s| s.name.as_str())
            .collect()
    }
}
