//! Locale-independent date labels for admin views.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// `January 15, 2024`
pub fn format_date_readable(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%B"), date.day(), date.year())
}

/// `2024-01-15 09:05`
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
