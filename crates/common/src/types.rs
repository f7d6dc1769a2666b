//! Common types used across Tickerwire
//!
//! This module provides the fundamental domain types passed between the
//! market-data, scoring, scheduling and publishing layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Maximum accepted length of a ticker symbol
pub const MAX_SYMBOL_LEN: usize = 12;

/// Normalize a caller-supplied ticker symbol
///
/// Trims whitespace and uppercases. Symbols may contain ASCII letters,
/// digits, `.` and `-` (e.g. `BRK.B`).
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_ascii_uppercase();

    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

    if valid {
        Ok(symbol)
    } else {
        Err(Error::InvalidSymbol(raw.to_string()))
    }
}

/// One OHLCV price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub timestamp: DateTime<Utc>,
    /// Number of trades in the bar, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,
    /// Volume-weighted average price, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

impl PriceBar {
    /// Create a bar without trade count or VWAP
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
            trade_count: None,
            vwap: None,
        }
    }
}

/// A ticker-specific news headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub headline: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewsItem {
    /// Create a headline-only news item
    pub fn headline(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            summary: None,
            source: None,
            url: None,
            symbols: Vec::new(),
            created_at: None,
        }
    }

    /// Attach a summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Headline and summary joined, as scanned for sentiment keywords
    pub fn text(&self) -> String {
        match &self.summary {
            Some(summary) => format!("{} {}", self.headline, summary),
            None => self.headline.clone(),
        }
    }
}

/// A general (non ticker-specific) news article from the world news source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldNewsItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Point-in-time bundle of latest bar, previous close and headlines for one symbol
///
/// `change` and `change_percent` are either both derived from the bar and the
/// previous close, or both `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub symbol: String,
    pub latest_bar: Option<PriceBar>,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub news: Vec<NewsItem>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Assemble a snapshot from independently fetched parts, deriving the change fields
    pub fn assemble(
        symbol: impl Into<String>,
        latest_bar: Option<PriceBar>,
        previous_close: Option<f64>,
        news: Vec<NewsItem>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let (change, change_percent) = match (&latest_bar, previous_close) {
            (Some(bar), Some(prev)) if prev != 0.0 => {
                let change = bar.close - prev;
                (Some(change), Some(change / prev * 100.0))
            }
            _ => (None, None),
        };

        Self {
            symbol: symbol.into(),
            latest_bar,
            previous_close,
            change,
            change_percent,
            news,
            fetched_at,
        }
    }

    /// Snapshot with no market data at all
    pub fn empty(symbol: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self::assemble(symbol, None, None, Vec::new(), fetched_at)
    }

    /// `change_percent`, treating missing data as a flat session
    pub fn change_percent_or_flat(&self) -> f64 {
        self.change_percent.unwrap_or(0.0)
    }

    /// Volume of the latest bar, if any
    pub fn volume(&self) -> Option<u64> {
        self.latest_bar.as_ref().map(|bar| bar.volume)
    }
}

/// A tracked instrument eligible for routine coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    pub is_active: bool,
    /// Higher is more urgent
    pub priority: i32,
    pub last_article_at: Option<DateTime<Utc>>,
}

impl Ticker {
    /// Create an active ticker that has never been covered
    pub fn new(symbol: impl Into<String>, priority: i32) -> Self {
        Self {
            symbol: symbol.into(),
            is_active: true,
            priority,
            last_article_at: None,
        }
    }

    /// Builder-style setter for `last_article_at`
    pub fn covered_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_article_at = Some(at);
        self
    }

    /// Builder-style setter for `is_active`
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A finished article ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body_markdown: String,
    pub tickers: Vec<String>,
    pub tags: Vec<String>,
    pub is_breaking: bool,
    pub model: Option<String>,
    pub prompt_version: Option<String>,
    pub market_snapshot: Option<MarketSnapshot>,
    /// Raw source items the article was generated from
    pub source_news: Option<serde_json::Value>,
    /// Integer signal score at generation time
    pub stock_score: Option<i32>,
    pub published_at: DateTime<Utc>,
}

/// A persisted article as returned by the content store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    #[serde(flatten)]
    pub content: NewArticle,
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// Wrap a new article with a fresh id
    pub fn from_new(content: NewArticle, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_at,
        }
    }

    pub fn slug(&self) -> &str {
        &self.content.slug
    }

    pub fn is_breaking(&self) -> bool {
        self.content.is_breaking
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.content.published_at
    }
}

/// Compact reference to a created article, returned to pipeline callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub is_breaking: bool,
}

impl From<&Article> for ArticleRef {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            slug: article.content.slug.clone(),
            title: article.content.title.clone(),
            published_at: article.content.published_at,
            symbol: article.content.tickers.first().cloned(),
            is_breaking: article.content.is_breaking,
        }
    }
}
