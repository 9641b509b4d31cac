//! Desktop notification of the current top movers.
//!
//! Delivery is best-effort: by the time a notification is sent the ranking
//! has already been computed and shown, so failures are logged and dropped.

use notify_rust::{Notification, Timeout};
use thiserror::Error;

use crate::config::NotifyConfig;
use crate::domain::Leaderboard;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification not delivered: {0}")]
    Delivery(String),
}

/// Signed percentage with one decimal: 0.123 → "+12.3%".
pub fn format_pct(fraction: f64) -> String {
    format!("{:+.1}%", fraction * 100.0)
}

/// Signed percentage with two decimals, for tables: 0.1234 → "+12.34%".
pub fn format_pct_precise(fraction: f64) -> String {
    format!("{:+.2}%", fraction * 100.0)
}

/// "AAPL +12.3%, NVDA +9.8%"
pub fn format_summary(leaderboard: &Leaderboard) -> String {
    leaderboard
        .entries()
        .iter()
        .map(|e| format!("{} {}", e.ticker, format_pct(e.pct_change)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Native desktop notifier: D-Bus on Linux/BSD, Notification Center on
/// macOS, toast on Windows.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    timeout_ms: u32,
}

impl DesktopNotifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        Notification::new()
            .appname("stockscout")
            .summary(title)
            .body(body)
            .timeout(Timeout::Milliseconds(self.timeout_ms))
            .show()
            .map(drop)
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

/// Send, logging instead of propagating failure. Returns whether it was delivered.
pub fn notify_best_effort(notifier: &dyn Notifier, title: &str, body: &str) -> bool {
    match notifier.notify(title, body) {
        Ok(()) => {
            tracing::info!(title, "notification sent");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "notification not delivered");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PerformanceRecord, PricePoint, PriceSeries, Ticker};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    fn record(symbol: &str, start: f64, end: f64) -> PerformanceRecord {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let series = PriceSeries::new(
            Ticker::parse(symbol).unwrap(),
            vec![
                PricePoint { date: d(1), close: start },
                PricePoint { date: d(2), close: end },
            ],
        );
        PerformanceRecord::from_series(series).unwrap()
    }

    struct Recorder {
        sent: RefCell<Vec<(String, String)>>,
        fail: bool,
    }

    impl Notifier for Recorder {
        fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Delivery("no notification daemon".into()));
            }
            self.sent.borrow_mut().push((title.into(), body.into()));
            Ok(())
        }
    }

    #[test]
    fn summary_lists_signed_percentages() {
        let board = Leaderboard::from_records(
            vec![record("NVDA", 100.0, 109.8), record("AAPL", 100.0, 112.3), record("MSFT", 300.0, 294.0)],
            3,
        );
        assert_eq!(format_summary(&board), "AAPL +12.3%, NVDA +9.8%, MSFT -2.0%");
    }

    #[test]
    fn empty_board_has_empty_summary() {
        assert_eq!(format_summary(&Leaderboard::default()), "");
    }

    #[test]
    fn best_effort_swallows_failures() {
        let failing = Recorder { sent: RefCell::new(Vec::new()), fail: true };
        assert!(!notify_best_effort(&failing, "t", "b"));

        let ok = Recorder { sent: RefCell::new(Vec::new()), fail: false };
        assert!(notify_best_effort(&ok, "Top movers update", "AAPL +1.0%"));
        assert_eq!(ok.sent.borrow()[0].0, "Top movers update");
    }

    #[test]
    fn percentages_keep_their_sign() {
        assert_eq!(format_pct(0.123), "+12.3%");
        assert_eq!(format_pct(-0.02), "-2.0%");
        assert_eq!(format_pct_precise(0.1234), "+12.34%");
        assert_eq!(format_pct_precise(-0.0525), "-5.25%");
        assert_eq!(format_pct_precise(0.0), "+0.00%");
    }

    #[test]
    fn delivery_error_names_the_cause() {
        let e = NotifyError::Delivery("no notification daemon".into());
        assert_eq!(e.to_string(), "notification not delivered: no notification daemon");
    }
}
