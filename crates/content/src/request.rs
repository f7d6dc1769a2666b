//! Generation inputs and outputs

use std::fmt;
use std::str::FromStr;

use common::{MarketSnapshot, WorldNewsItem};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Macro-economic article topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacroTopic {
    FedPolicy,
    Inflation,
    Employment,
    Gdp,
    GlobalMarkets,
    Commodities,
    CryptoMarket,
    SectorRotation,
}

impl MacroTopic {
    pub const ALL: [MacroTopic; 8] = [
        MacroTopic::FedPolicy,
        MacroTopic::Inflation,
        MacroTopic::Employment,
        MacroTopic::Gdp,
        MacroTopic::GlobalMarkets,
        MacroTopic::Commodities,
        MacroTopic::CryptoMarket,
        MacroTopic::SectorRotation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroTopic::FedPolicy => "fed-policy",
            MacroTopic::Inflation => "inflation",
            MacroTopic::Employment => "employment",
            MacroTopic::Gdp => "gdp",
            MacroTopic::GlobalMarkets => "global-markets",
            MacroTopic::Commodities => "commodities",
            MacroTopic::CryptoMarket => "crypto-market",
            MacroTopic::SectorRotation => "sector-rotation",
        }
    }

    /// Human-readable subject used in prompts and placeholder titles
    pub fn label(&self) -> &'static str {
        match self {
            MacroTopic::FedPolicy => "Federal Reserve Policy",
            MacroTopic::Inflation => "Inflation",
            MacroTopic::Employment => "Employment and the Labor Market",
            MacroTopic::Gdp => "GDP and Economic Growth",
            MacroTopic::GlobalMarkets => "Global Markets",
            MacroTopic::Commodities => "Commodities",
            MacroTopic::CryptoMarket => "The Crypto Market",
            MacroTopic::SectorRotation => "Sector Rotation",
        }
    }

    /// Uniformly random topic
    pub fn random() -> Self {
        *Self::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&MacroTopic::GlobalMarkets)
    }
}

impl fmt::Display for MacroTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MacroTopic {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s.trim())
            .ok_or_else(|| ContentError::UnknownTopic(s.to_string()))
    }
}

/// What to write about
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Ticker {
        symbol: String,
        snapshot: MarketSnapshot,
        is_breaking: bool,
    },
    WorldNews {
        items: Vec<WorldNewsItem>,
    },
    Macro {
        topic: MacroTopic,
    },
}

impl GenerationRequest {
    /// Title used when the generator returns none
    pub fn fallback_title(&self) -> String {
        match self {
            GenerationRequest::Ticker { symbol, .. } => format!("{symbol} Market Update"),
            GenerationRequest::WorldNews { .. } => "World News Roundup".to_string(),
            GenerationRequest::Macro { topic } => format!("{} Outlook", topic.label()),
        }
    }

    /// Excerpt used when the generator returns none
    pub fn fallback_excerpt(&self) -> String {
        match self {
            GenerationRequest::Ticker { symbol, .. } => format!("Market analysis for {symbol}."),
            GenerationRequest::WorldNews { .. } => {
                "The latest global headlines and what they mean for markets.".to_string()
            }
            GenerationRequest::Macro { topic } => {
                format!("A look at {} and its market implications.", topic.label())
            }
        }
    }

    /// Tags used when the generator returns none
    pub fn fallback_tags(&self) -> Vec<String> {
        match self {
            GenerationRequest::Ticker { .. } => vec!["market-update".to_string()],
            GenerationRequest::WorldNews { .. } => {
                vec!["world-news".to_string(), "breaking-news".to_string()]
            }
            GenerationRequest::Macro { topic } => {
                vec!["macro".to_string(), topic.as_str().to_string()]
            }
        }
    }
}

/// Article text returned by a generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub title: String,
    pub excerpt: String,
    pub body_markdown: String,
    pub tags: Vec<String>,
    pub model: String,
    pub prompt_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_topic_parse() {
        assert_eq!("fed-policy".parse::<MacroTopic>().unwrap(), MacroTopic::FedPolicy);
        assert_eq!(" gdp ".parse::<MacroTopic>().unwrap(), MacroTopic::Gdp);
        assert_matches!("weather".parse::<MacroTopic>(), Err(ContentError::UnknownTopic(_)));
    }

    #[test]
    fn test_topic_serde_matches_as_str() {
        for topic in MacroTopic::ALL {
            let json = serde_json::to_string(&topic).unwrap();
            assert_eq!(json, format!("\"{}\"", topic.as_str()));
        }
    }

    #[test]
    fn test_random_topic_is_known() {
        for _ in 0..20 {
            assert!(MacroTopic::ALL.contains(&MacroTopic::random()));
        }
    }
}
