//! Threshold rules

use chrono::{DateTime, Utc};
use common::MarketSnapshot;

use crate::types::{BreakingNewsEvent, Severity};

/// Absolute session change that qualifies on its own
pub const LARGE_MOVE_PCT: f64 = 5.0;
/// Volume multiple of the baseline for a volume spike
pub const VOLUME_SPIKE_RATIO: f64 = 3.0;
/// Minimum absolute change accompanying a volume spike
pub const VOLUME_SPIKE_MIN_MOVE_PCT: f64 = 2.0;

/// Apply the large-move rule, then the volume-spike rule
///
/// A symbol without a latest bar never qualifies. At most one event is
/// produced per snapshot.
pub fn evaluate(
    snapshot: &MarketSnapshot,
    baseline_volume: f64,
    detected_at: DateTime<Utc>,
) -> Option<BreakingNewsEvent> {
    let bar = snapshot.latest_bar.as_ref()?;
    let change = snapshot.change_percent_or_flat();
    let magnitude = change.abs();

    let event = |reason: String, severity: Severity, volume_change: Option<f64>| BreakingNewsEvent {
        symbol: snapshot.symbol.clone(),
        reason,
        severity,
        price_change: change,
        volume_change,
        detected_at,
        market_data: snapshot.clone(),
    };

    if magnitude >= LARGE_MOVE_PCT {
        let severity = if magnitude >= 10.0 {
            Severity::High
        } else if magnitude >= 7.0 {
            Severity::Medium
        } else {
            Severity::Low
        };
        let verb = if change >= 0.0 { "Surged" } else { "Plunged" };
        return Some(event(
            format!("{} {:.2}% in recent trading", verb, magnitude),
            severity,
            None,
        ));
    }

    if baseline_volume > 0.0 {
        let ratio = bar.volume as f64 / baseline_volume;
        if ratio >= VOLUME_SPIKE_RATIO && magnitude >= VOLUME_SPIKE_MIN_MOVE_PCT {
            let severity = if ratio >= 5.0 { Severity::High } else { Severity::Medium };
            return Some(event(
                format!(
                    "Unusual volume detected ({:.1}x average) with {:.2}% price movement",
                    ratio, magnitude
                ),
                severity,
                Some(ratio),
            ));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::PriceBar;

    const BASELINE: f64 = 1_000_000.0;

    fn snapshot(close: f64, volume: u64) -> MarketSnapshot {
        let bar = PriceBar::new(100.0, close.max(100.0), close.min(100.0), close, volume, Utc::now());
        MarketSnapshot::assemble("TEST", Some(bar), Some(100.0), vec![], Utc::now())
    }

    #[test]
    fn test_plunge_with_volume_spike_is_high_large_move() {
        let event = evaluate(&snapshot(89.0, 6_000_000), BASELINE, Utc::now()).unwrap();

        assert_eq!(event.severity, Severity::High);
        assert!(event.reason.contains("Plunged"));
        assert_eq!(event.reason, "Plunged 11.00% in recent trading");
        assert_eq!(event.volume_change, None);
    }

    #[test]
    fn test_large_move_severity_bands() {
        let severity = |close: f64| evaluate(&snapshot(close, 0), BASELINE, Utc::now()).map(|e| e.severity);

        assert_eq!(severity(110.0), Some(Severity::High));
        assert_eq!(severity(107.5), Some(Severity::Medium));
        assert_eq!(severity(105.0), Some(Severity::Low));
        assert_eq!(severity(104.9), None);
    }

    #[test]
    fn test_volume_spike() {
        let event = evaluate(&snapshot(103.0, 4_000_000), BASELINE, Utc::now()).unwrap();
        assert_eq!(event.severity, Severity::Medium);
        assert_eq!(
            event.reason,
            "Unusual volume detected (4.0x average) with 3.00% price movement"
        );
        assert_eq!(event.volume_change, Some(4.0));

        let heavy = evaluate(&snapshot(97.0, 5_000_000), BASELINE, Utc::now()).unwrap();
        assert_eq!(heavy.severity, Severity::High);
    }

    #[test]
    fn test_volume_spike_needs_a_price_move() {
        assert!(evaluate(&snapshot(101.0, 9_000_000), BASELINE, Utc::now()).is_none());
    }

    #[test]
    fn test_baseline_is_injectable() {
        assert!(evaluate(&snapshot(103.0, 2_000_000), BASELINE, Utc::now()).is_none());
        assert!(evaluate(&snapshot(103.0, 2_000_000), 500_000.0, Utc::now()).is_some());
    }

    #[test]
    fn test_no_bar_never_qualifies() {
        let mut snap = snapshot(80.0, 9_000_000);
        snap.latest_bar = None;
        assert!(evaluate(&snap, BASELINE, Utc::now()).is_none());
    }
}
