// Utility functions
use chrono::NaiveDate;

/// Parses an ISO `YYYY-MM-DD` date, if possible.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Percent change from `previous` to `current`; `None` when `previous` is not positive.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous > 0.0 {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}
