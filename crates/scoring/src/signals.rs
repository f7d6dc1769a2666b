//! The five indicators
//!
//! Each analyzer reads one aspect of a snapshot and returns a classified
//! [`SignalResult`] with a fixed weight. Weights sum to 100.

use common::MarketSnapshot;

use crate::types::{Signal, SignalResult};

pub const MOMENTUM_WEIGHT: u32 = 25;
pub const VOLUME_WEIGHT: u32 = 20;
pub const SENTIMENT_WEIGHT: u32 = 25;
pub const RANGE_WEIGHT: u32 = 15;
pub const TREND_WEIGHT: u32 = 15;

/// Bar volume above which a move counts as volume-confirmed
pub const HIGH_VOLUME: u64 = 1_000_000;

pub const POSITIVE_KEYWORDS: [&str; 12] = [
    "surge",
    "gain",
    "rise",
    "beat",
    "exceed",
    "growth",
    "profit",
    "upgrade",
    "bullish",
    "strong",
    "record",
    "breakthrough",
];

pub const NEGATIVE_KEYWORDS: [&str; 12] = [
    "fall",
    "drop",
    "decline",
    "miss",
    "loss",
    "downgrade",
    "bearish",
    "weak",
    "concern",
    "risk",
    "warning",
    "lawsuit",
];

/// Momentum from the session change
pub fn momentum(snapshot: &MarketSnapshot) -> SignalResult {
    let pct = snapshot.change_percent_or_flat();

    let (signal, description) = if pct > 2.0 {
        (Signal::Bullish, format!("Strong upward momentum (+{:.2}%)", pct))
    } else if pct > 0.5 {
        (Signal::Bullish, format!("Positive momentum (+{:.2}%)", pct))
    } else if pct < -2.0 {
        (Signal::Bearish, format!("Strong downward pressure ({:.2}%)", pct))
    } else if pct < -0.5 {
        (Signal::Bearish, format!("Negative momentum ({:.2}%)", pct))
    } else {
        (Signal::Neutral, format!("Flat price action ({:.2}%)", pct))
    };

    SignalResult::new("Price Momentum", MOMENTUM_WEIGHT, signal, description)
}

/// Volume confirmation of the price move
///
/// [`HIGH_VOLUME`] is an absolute threshold; no historical average is used.
pub fn volume(snapshot: &MarketSnapshot) -> SignalResult {
    const NAME: &str = "Volume Analysis";

    let Some(bar) = &snapshot.latest_bar else {
        return SignalResult::new(NAME, VOLUME_WEIGHT, Signal::Neutral, "Volume data unavailable");
    };

    let pct = snapshot.change_percent_or_flat();
    let heavy = bar.volume > HIGH_VOLUME;

    let (signal, description) = if heavy && pct > 0.0 {
        (Signal::Bullish, "High volume supporting price increase")
    } else if heavy && pct < 0.0 {
        (Signal::Bearish, "High volume on price decline")
    } else if !heavy && pct.abs() > 1.0 {
        (Signal::Neutral, "Price move on low volume - caution advised")
    } else {
        (Signal::Neutral, "Normal trading volume")
    };

    SignalResult::new(NAME, VOLUME_WEIGHT, signal, description)
}

/// Keyword hits as (positive, negative) over every headline and summary
///
/// A keyword counts once per news item in which it appears.
pub fn keyword_counts(snapshot: &MarketSnapshot) -> (usize, usize) {
    snapshot.news.iter().fold((0, 0), |(pos, neg), item| {
        let text = item.text().to_lowercase();
        let hits = |keywords: &[&str]| keywords.iter().filter(|k| text.contains(*k)).count();
        (pos + hits(&POSITIVE_KEYWORDS), neg + hits(&NEGATIVE_KEYWORDS))
    })
}

/// Keyword sentiment across recent headlines
pub fn news_sentiment(snapshot: &MarketSnapshot) -> SignalResult {
    const NAME: &str = "News Sentiment";

    if snapshot.news.is_empty() {
        return SignalResult::new(NAME, SENTIMENT_WEIGHT, Signal::Neutral, "No recent news to analyze");
    }

    let (positive, negative) = keyword_counts(snapshot);

    let (signal, description) = if positive > negative + 2 {
        (
            Signal::Bullish,
            format!("Positive news sentiment ({} bullish signals)", positive),
        )
    } else if negative > positive + 2 {
        (
            Signal::Bearish,
            format!("Negative news sentiment ({} bearish signals)", negative),
        )
    } else {
        (Signal::Neutral, "Mixed or neutral news sentiment".to_string())
    };

    SignalResult::new(NAME, SENTIMENT_WEIGHT, signal, description)
}

/// Where the close sits within the session's high-low range
pub fn price_range(snapshot: &MarketSnapshot) -> SignalResult {
    const NAME: &str = "Price Range";

    let Some(bar) = &snapshot.latest_bar else {
        return SignalResult::new(NAME, RANGE_WEIGHT, Signal::Neutral, "Price range data unavailable");
    };

    let range = bar.high - bar.low;
    if range <= 0.0 || !range.is_finite() {
        return SignalResult::new(NAME, RANGE_WEIGHT, Signal::Neutral, "No intraday range to evaluate");
    }

    let position = (bar.close - bar.low) / range;
    let pct_of_range = (position * 100.0).round();

    let (signal, description) = if position > 0.7 {
        (
            Signal::Bullish,
            format!("Closed near session high ({:.0}% of range)", pct_of_range),
        )
    } else if position < 0.3 {
        (
            Signal::Bearish,
            format!("Closed near session low ({:.0}% of range)", pct_of_range),
        )
    } else {
        (
            Signal::Neutral,
            format!("Closed mid-range ({:.0}% of range)", pct_of_range),
        )
    };

    SignalResult::new(NAME, RANGE_WEIGHT, signal, description)
}

/// Intraday open-to-close direction confirmed by the session change
pub fn trend(snapshot: &MarketSnapshot) -> SignalResult {
    const NAME: &str = "Trend Analysis";

    let bar = match &snapshot.latest_bar {
        Some(bar) if bar.open != 0.0 => bar,
        _ => return SignalResult::new(NAME, TREND_WEIGHT, Signal::Neutral, "Trend data unavailable"),
    };

    let pct = snapshot.change_percent_or_flat();
    let open_to_close = (bar.close - bar.open) / bar.open * 100.0;

    let (signal, description) = if open_to_close > 1.0 && pct > 0.0 {
        (Signal::Bullish, "Uptrend confirmed - higher close than open")
    } else if open_to_close < -1.0 && pct < 0.0 {
        (Signal::Bearish, "Downtrend confirmed - lower close than open")
    } else if open_to_close.abs() < 0.5 {
        (Signal::Neutral, "Consolidation pattern - indecisive")
    } else {
        (Signal::Neutral, "Mixed signals in trend direction")
    };

    SignalResult::new(NAME, TREND_WEIGHT, signal, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{NewsItem, PriceBar};

    fn snapshot(bar: Option<PriceBar>, prev: Option<f64>, news: Vec<NewsItem>) -> MarketSnapshot {
        MarketSnapshot::assemble("TEST", bar, prev, news, Utc::now())
    }

    fn bar(open: f64, high: f64, low: f64, close: f64, volume: u64) -> Option<PriceBar> {
        Some(PriceBar::new(open, high, low, close, volume, Utc::now()))
    }

    #[test]
    fn test_momentum_bands() {
        let cases = [
            (103.0, Signal::Bullish, "Strong upward momentum (+3.00%)"),
            (101.0, Signal::Bullish, "Positive momentum (+1.00%)"),
            (100.2, Signal::Neutral, "Flat price action (0.20%)"),
            (99.0, Signal::Bearish, "Negative momentum (-1.00%)"),
            (97.0, Signal::Bearish, "Strong downward pressure (-3.00%)"),
        ];
        for (close, expected, description) in cases {
            let result = momentum(&snapshot(bar(100.0, 104.0, 96.0, close, 10), Some(100.0), vec![]));
            assert_eq!(result.signal, expected, "close {}", close);
            assert_eq!(result.description, description);
        }
    }

    #[test]
    fn test_volume_rules() {
        let heavy_up = snapshot(bar(100.0, 103.0, 99.0, 102.0, 2_000_000), Some(100.0), vec![]);
        assert_eq!(volume(&heavy_up).signal, Signal::Bullish);

        let heavy_down = snapshot(bar(100.0, 101.0, 97.0, 98.0, 2_000_000), Some(100.0), vec![]);
        assert_eq!(volume(&heavy_down).signal, Signal::Bearish);

        let thin_move = snapshot(bar(100.0, 103.0, 99.0, 102.0, 10_000), Some(100.0), vec![]);
        let result = volume(&thin_move);
        assert_eq!(result.signal, Signal::Neutral);
        assert!(result.description.contains("caution"));

        let missing = snapshot(None, None, vec![]);
        assert_eq!(volume(&missing).description, "Volume data unavailable");
    }

    #[test]
    fn test_volume_threshold_is_exclusive() {
        let at = snapshot(bar(100.0, 103.0, 99.0, 102.0, HIGH_VOLUME), Some(100.0), vec![]);
        assert_eq!(volume(&at).signal, Signal::Neutral);

        let above = snapshot(bar(100.0, 103.0, 99.0, 102.0, HIGH_VOLUME + 1), Some(100.0), vec![]);
        assert_eq!(volume(&above).signal, Signal::Bullish);
    }

    #[test]
    fn test_sentiment_needs_margin_of_three() {
        let bullish_news = vec![
            NewsItem::headline("Shares surge to record").with_summary("Strong profit growth"),
        ];
        let result = news_sentiment(&snapshot(None, None, bullish_news));
        assert_eq!(result.signal, Signal::Bullish);

        let mixed = vec![NewsItem::headline("Profit beat, but lawsuit risk lingers")];
        assert_eq!(news_sentiment(&snapshot(None, None, mixed)).signal, Signal::Neutral);

        let bearish_news = vec![
            NewsItem::headline("Analyst downgrade on weak guidance")
                .with_summary("Loss widens amid lawsuit concern"),
        ];
        assert_eq!(news_sentiment(&snapshot(None, None, bearish_news)).signal, Signal::Bearish);
    }

    #[test]
    fn test_price_range_position() {
        let near_high = snapshot(bar(100.0, 110.0, 100.0, 109.0, 10), None, vec![]);
        let result = price_range(&near_high);
        assert_eq!(result.signal, Signal::Bullish);
        assert_eq!(result.description, "Closed near session high (90% of range)");

        let near_low = snapshot(bar(100.0, 110.0, 100.0, 101.0, 10), None, vec![]);
        assert_eq!(price_range(&near_low).signal, Signal::Bearish);

        let flat = snapshot(bar(100.0, 100.0, 100.0, 100.0, 10), None, vec![]);
        assert_eq!(price_range(&flat).signal, Signal::Neutral);
    }

    #[test]
    fn test_trend_requires_confirming_change() {
        let up = snapshot(bar(100.0, 103.0, 99.0, 102.0, 10), Some(100.0), vec![]);
        assert_eq!(trend(&up).signal, Signal::Bullish);

        // Higher close than open, but down versus the previous close
        let unconfirmed = snapshot(bar(100.0, 103.0, 99.0, 102.0, 10), Some(105.0), vec![]);
        let result = trend(&unconfirmed);
        assert_eq!(result.signal, Signal::Neutral);
        assert_eq!(result.description, "Mixed signals in trend direction");

        let flat = snapshot(bar(100.0, 101.0, 99.0, 100.2, 10), Some(100.0), vec![]);
        assert!(trend(&flat).description.starts_with("Consolidation"));
    }
}
