//! Time utilities.
//!
//! Timestamps are `chrono::DateTime<Utc>`; calendar dates (open/close,
//! assignment, hire) are `NaiveDate`.

use chrono::{DateTime, NaiveDate, Utc};

/// Current instant.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a timestamp the way timeline entries display it: `yyyy-MM-dd HH:mm UTC`.
pub fn display_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Format a calendar date as `yyyy-MM-dd`.
pub fn display_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `yyyy-MM-dd` date. Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
