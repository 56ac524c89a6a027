//! Cell coercion for the source extracts.
//!
//! What this module provides:
//! - [`parse_timestamp`]: a timezone-naive date-time from the layouts seen in the
//!   constituent extracts. A leading weekday token (`"Mon, "`) is dropped, and a
//!   trailing UTC offset is accepted but not applied: the wall time is kept.
//! - [`parse_flag`]: 0/1 style booleans, including their float spellings.
//! - [`parse_id`] / [`parse_int`]: integer keys, tolerating `"12.0"`.
//!
//! Every parser returns `None` on failure; the caller knows the table and column
//! and turns that into a [`DataFormatError`](crate::errors::DataFormatError).
//!
//! Examples
//! - "Mon, 2020-03-05 10:15:00" -> 2020-03-05T10:15:00
//! - "Tue, 08 Apr 2014 18:33:02 -0500" -> 2014-04-08T18:33:02
//! - "Tue, 08 Apr 2014 18:33:02 GMT" -> 2014-04-08T18:33:02

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d %b %Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%d %b %Y %H:%M:%S %z",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a source timestamp cell.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    // RFC 2822 carries named zones (GMT, UT, EST, ...) that `%z` does not.
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_local());
    }

    let s = strip_weekday(trimmed);
    if s.is_empty() {
        return None;
    }

    if let Some(dt) = NAIVE_LAYOUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_LAYOUTS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATE_LAYOUTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Drop a `"<Weekday>, "` prefix if present.
fn strip_weekday(s: &str) -> &str {
    match s.split_once(',') {
        Some((head, rest)) if !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic()) => {
            rest.trim_start()
        }
        _ => s,
    }
}

/// Parse a boolean flag cell (`1`/`0`, `true`/`false`, `yes`/`no`, ...).
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Parse a non-negative integer key.
pub fn parse_id(raw: &str) -> Option<u64> {
    let n = parse_int(raw)?;
    u64::try_from(n).ok()
}

/// Parse a signed integer cell; whole-valued floats (`"3.0"`) are accepted.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
