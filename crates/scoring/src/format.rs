//! Markdown presentation of a [`StockScore`]

use std::fmt::Write;

use crate::types::{Rating, Signal, StockScore};

const DISCLAIMER: &str = "> ⚠️ *This rating is generated algorithmically based on publicly available market data and should not be considered financial advice. Always conduct your own research before making investment decisions.*";

fn rating_badge(rating: Rating) -> &'static str {
    match rating {
        Rating::Buy => "🟢",
        Rating::Hold => "🟡",
        Rating::Sell => "🔴",
    }
}

fn signal_marker(signal: Signal) -> &'static str {
    match signal {
        Signal::Bullish => "📈",
        Signal::Neutral => "➡️",
        Signal::Bearish => "📉",
    }
}

/// Render the rating table, signal breakdown, summary and disclaimer
pub fn format_rating_markdown(score: &StockScore) -> String {
    let mut md = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(md, "## Tickerwire Rating\n");
    let _ = writeln!(md, "| Metric | Value |");
    let _ = writeln!(md, "|--------|-------|");
    let _ = writeln!(
        md,
        "| **Rating** | {} {} |",
        rating_badge(score.overall),
        score.overall.as_str().to_uppercase()
    );
    let sign = if score.score > 0 { "+" } else { "" };
    let _ = writeln!(md, "| **Score** | {}{}/100 |", sign, score.score);
    let _ = writeln!(md, "| **Confidence** | {} |\n", score.confidence.label());

    let _ = writeln!(md, "### Signal Breakdown\n");
    for signal in &score.signals {
        let _ = writeln!(
            md,
            "- **{}** {}: {}",
            signal.name,
            signal_marker(signal.signal),
            signal.description
        );
    }

    let _ = writeln!(md, "\n### Analysis\n\n{}", score.summary);
    let _ = writeln!(md, "\n{}", DISCLAIMER);
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignalScorer;
    use chrono::Utc;
    use common::{MarketSnapshot, PriceBar};

    #[test]
    fn test_markdown_sections() {
        let bar = PriceBar::new(100.0, 112.0, 99.0, 112.0, 2_000_000, Utc::now());
        let snapshot = MarketSnapshot::assemble("NVDA", Some(bar), Some(100.0), vec![], Utc::now());
        let md = format_rating_markdown(&SignalScorer.score(&snapshot));

        assert!(md.starts_with("## Tickerwire Rating"));
        assert!(md.contains("| **Rating** | 🟢 BUY |"));
        assert!(md.contains("| **Score** | +75/100 |"));
        assert!(md.contains("- **Price Momentum** 📈: Strong upward momentum (+12.00%)"));
        assert!(md.contains("### Analysis"));
        assert!(md.trim_end().ends_with("investment decisions.*"));
    }

    #[test]
    fn test_zero_score_has_no_sign() {
        let md = format_rating_markdown(
            &SignalScorer.score(&MarketSnapshot::empty("AAPL", Utc::now())),
        );
        assert!(md.contains("| **Score** | 0/100 |"));
        assert!(md.contains("🟡 HOLD"));
    }
}
