//! UTC calendar-day windows
//!
//! The daily routine quota is counted over `[start of UTC day, next UTC midnight)`.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open UTC day window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtcDayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl UtcDayWindow {
    /// Window covering the UTC calendar day that contains `now`
    pub fn containing(now: DateTime<Utc>) -> Self {
        let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Returns true if `at` falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_bounds() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 17, 45, 12).unwrap();
        let window = UtcDayWindow::containing(now);

        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_is_half_open() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap();
        let window = UtcDayWindow::containing(now);

        assert!(window.contains(window.start));
        assert!(window.contains(Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap()));
        assert!(!window.contains(window.end));
    }
}
