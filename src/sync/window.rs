//! Sync window computation.

use chrono::{Duration, NaiveDate};

/// The `[from, to]` date range bounding one synchronization run's provider
/// queries, so a run never scans full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl SyncWindow {
    /// Compute the window for a run executing on `today`.
    ///
    /// Starts one day after the latest locally stored booking date, or
    /// `lookback_days` before today when the account has no dated history.
    pub fn compute(
        latest_booking_date: Option<NaiveDate>,
        today: NaiveDate,
        lookback_days: i64,
    ) -> Self {
        let from = match latest_booking_date {
            // Start after the last known booking date.
            Some(latest) => latest + Duration::days(1),
            None => today - Duration::days(lookback_days),
        };
        Self { from, to: today }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn starts_one_day_after_latest_booking_date() {
        let window = SyncWindow::compute(Some(date("2024-01-10")), date("2024-02-01"), 30);
        assert_eq!(window.from, date("2024-01-11"));
        assert_eq!(window.to, date("2024-02-01"));
    }

    #[test]
    fn falls_back_to_lookback_without_history() {
        let window = SyncWindow::compute(None, date("2024-02-01"), 30);
        assert_eq!(window.from, date("2024-01-02"));
        assert_eq!(window.to, date("2024-02-01"));
    }

    #[test]
    fn crosses_month_boundaries() {
        let window = SyncWindow::compute(Some(date("2024-02-29")), date("2024-03-05"), 30);
        assert_eq!(window.from, date("2024-03-01"));
    }
}
