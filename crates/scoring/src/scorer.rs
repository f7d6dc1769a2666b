use common::MarketSnapshot;

use crate::signals;
use crate::types::{Confidence, Rating, Signal, SignalResult, StockScore};

#[derive(Debug, Clone, Copy, Default)]
pub struct SignalScorer;

impl SignalScorer {
    /// Score a snapshot
    pub fn score(&self, snapshot: &MarketSnapshot) -> StockScore {
        let signals = vec![
            signals::momentum(snapshot),
            signals::volume(snapshot),
            signals::news_sentiment(snapshot),
            signals::price_range(snapshot),
            signals::trend(snapshot),
        ];
        aggregate(signals)
    }
}

/// Combine classified signals into a score, rating and confidence
pub fn aggregate(signals: Vec<SignalResult>) -> StockScore {
    let total_weight: i64 = signals.iter().map(|s| i64::from(s.weight)).sum();
    let weighted: i64 = signals
        .iter()
        .map(|s| i64::from(s.signal.direction()) * i64::from(s.weight))
        .sum();

    let score = if total_weight > 0 {
        (weighted as f64 / total_weight as f64 * 100.0).round() as i32
    } else {
        0
    };

    let bullish = signals.iter().filter(|s| s.signal == Signal::Bullish).count();
    let bearish = signals.iter().filter(|s| s.signal == Signal::Bearish).count();

    let mut result = StockScore {
        overall: Rating::from_score(score),
        score,
        confidence: Confidence::from_agreement(bullish, bearish),
        signals,
        summary: String::new(),
    };
    result.summary = summarize(&result);
    result
}

/// One-paragraph explanation naming the signals that drove the rating
fn summarize(score: &StockScore) -> String {
    let bullish = score.names_with(Signal::Bullish);
    let bearish = score.names_with(Signal::Bearish);

    match score.overall {
        Rating::Buy => {
            let mut summary = format!("**Buy Signal** (Score: +{}) - ", score.score);
            summary.push_str(match score.confidence {
                Confidence::High => "Strong bullish indicators across multiple metrics. ",
                Confidence::Medium => "Moderately bullish with some supporting signals. ",
                Confidence::Low => "Slight bullish lean but signals are mixed. ",
            });
            if !bullish.is_empty() {
                summary.push_str(&format!("Positive factors: {}.", bullish.join(", ")));
            }
            summary
        }
        Rating::Sell => {
            let mut summary = format!("**Sell Signal** (Score: {}) - ", score.score);
            summary.push_str(match score.confidence {
                Confidence::High => "Strong bearish indicators across multiple metrics. ",
                Confidence::Medium => "Moderately bearish with concerning signals. ",
                Confidence::Low => "Slight bearish lean but signals are mixed. ",
            });
            if !bearish.is_empty() {
                summary.push_str(&format!("Negative factors: {}.", bearish.join(", ")));
            }
            summary
        }
        Rating::Hold => {
            let mut summary = format!(
                "**Hold Signal** (Score: {}) - Mixed signals suggest waiting for clearer direction. ",
                score.score
            );
            if !bullish.is_empty() && !bearish.is_empty() {
                summary.push_str(&format!(
                    "Bullish: {}. Bearish: {}.",
                    bullish.join(", "),
                    bearish.join(", ")
                ));
            }
            summary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{NewsItem, PriceBar};

    fn scorer() -> SignalScorer {
        SignalScorer
    }

    #[test]
    fn test_empty_snapshot_holds_with_low_confidence() {
        let snapshot = MarketSnapshot::empty("AAPL", Utc::now());
        let score = scorer().score(&snapshot);

        assert_eq!(score.score, 0);
        assert_eq!(score.overall, Rating::Hold);
        assert_eq!(score.confidence, Confidence::Low);
        assert_eq!(score.signals.len(), 5);
        assert!(score.signals.iter().all(|s| s.signal == Signal::Neutral));
    }

    #[test]
    fn test_strong_move_on_heavy_volume_is_buy() {
        // +12% on 2M shares, closing at the session high
        let bar = PriceBar::new(100.0, 112.0, 99.0, 112.0, 2_000_000, Utc::now());
        let snapshot = MarketSnapshot::assemble("NVDA", Some(bar), Some(100.0), vec![], Utc::now());
        let score = scorer().score(&snapshot);

        assert_eq!(score.signals[0].signal, Signal::Bullish);
        assert!(score.signals[0].description.starts_with("Strong upward momentum"));
        assert_eq!(score.signals[1].signal, Signal::Bullish);
        assert!(score.score >= 30);
        assert_eq!(score.overall, Rating::Buy);
        assert!(score.summary.starts_with("**Buy Signal** (Score: +"));
    }

    #[test]
    fn test_momentum_and_volume_alone_reach_buy() {
        // Only change and volume known: bar closes mid-range with a flat open
        let bar = PriceBar::new(112.0, 114.0, 110.0, 112.0, 2_000_000, Utc::now());
        let snapshot = MarketSnapshot::assemble("AMD", Some(bar), Some(100.0), vec![], Utc::now());
        let score = scorer().score(&snapshot);

        assert_eq!(score.score, 45);
        assert_eq!(score.overall, Rating::Buy);
        assert_eq!(score.confidence, Confidence::Low);
    }

    #[test]
    fn test_all_bearish_is_high_confidence_sell() {
        let bar = PriceBar::new(100.0, 100.5, 89.0, 89.5, 3_000_000, Utc::now());
        let news = vec![NewsItem::headline("Shares drop on weak outlook")
            .with_summary("Downgrade and lawsuit concern")];
        let snapshot = MarketSnapshot::assemble("XYZ", Some(bar), Some(100.0), news, Utc::now());
        let score = scorer().score(&snapshot);

        assert_eq!(score.score, -100);
        assert_eq!(score.overall, Rating::Sell);
        assert_eq!(score.confidence, Confidence::High);
        assert!(score.summary.contains("Negative factors: Price Momentum"));
    }

    #[test]
    fn test_score_always_in_bounds() {
        let cases = [
            (50.0, 200.0, 10.0, 190.0, 100.0),
            (100.0, 101.0, 99.0, 100.0, 100.0),
            (200.0, 210.0, 20.0, 25.0, 200.0),
            (100.0, 100.0, 100.0, 100.0, 0.0),
        ];
        for (open, high, low, close, prev) in cases {
            for volume in [0, 500_000, 5_000_000] {
                let bar = PriceBar::new(open, high, low, close, volume, Utc::now());
                let snapshot = MarketSnapshot::assemble("T", Some(bar), Some(prev), vec![], Utc::now());
                let score = scorer().score(&snapshot);

                assert!((-100..=100).contains(&score.score));
                assert_eq!(score.overall, Rating::from_score(score.score));
            }
        }
    }

    #[test]
    fn test_summary_is_deterministic() {
        let bar = PriceBar::new(100.0, 104.0, 98.0, 101.0, 800_000, Utc::now());
        let snapshot = MarketSnapshot::assemble("KO", Some(bar), Some(102.0), vec![], Utc::now());

        assert_eq!(scorer().score(&snapshot), scorer().score(&snapshot));
    }
}
