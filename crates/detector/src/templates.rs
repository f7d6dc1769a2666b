//! Deterministic headline and excerpt text for breaking events

use crate::types::{BreakingNewsEvent, Severity};

pub fn event_title(event: &BreakingNewsEvent) -> String {
    let change = event.price_change;
    if change >= 5.0 {
        format!("{} Soars {:.2}% on Heavy Trading", event.symbol, change)
    } else if change <= -5.0 {
        format!(
            "{} Plunges {:.2}% Amid Market Volatility",
            event.symbol,
            change.abs()
        )
    } else {
        format!("{} Shows Unusual Activity: {}", event.symbol, event.reason)
    }
}

pub fn event_excerpt(event: &BreakingNewsEvent) -> String {
    match event.severity {
        Severity::High => format!(
            "Breaking: {} experiences significant movement with {:.2}% change. {}.",
            event.symbol,
            event.price_change.abs(),
            event.reason
        ),
        Severity::Medium | Severity::Low => format!(
            "{} shows notable trading activity. {}.",
            event.symbol, event.reason
        ),
    }
}
