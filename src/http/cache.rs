//! HTTP cache validation module
//!
//! Evaluates `If-Modified-Since` against a file's modification time and
//! formats `Last-Modified` values.
//!
//! The default comparison is exact equality: only a header naming the very
//! same instant as the file's modification time lets the body be omitted.
//! [`ConditionalMode::Since`] switches to the usual "not modified since"
//! rule.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// Comparison used for `If-Modified-Since`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalMode {
    /// Header must equal the modification time to the millisecond
    #[default]
    Exact,
    /// File must not have changed after the header time (second resolution)
    Since,
}

/// Outcome of conditional evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Serve the full response
    Fresh,
    /// Answer 304 and suppress the body
    NotModified,
}

/// Evaluate an `If-Modified-Since` header value against a modification time
///
/// # Arguments
/// * `header` - Raw header value, if the client sent one
/// * `last_modified_ms` - File modification time, millis since the epoch
/// * `mode` - Comparison rule
pub fn evaluate(header: Option<&str>, last_modified_ms: i64, mode: ConditionalMode) -> Freshness {
    evaluate_millis(header.and_then(parse_validation_header), last_modified_ms, mode)
}

/// Evaluate an already parsed header timestamp
pub const fn evaluate_millis(
    since_ms: Option<i64>,
    last_modified_ms: i64,
    mode: ConditionalMode,
) -> Freshness {
    let Some(since_ms) = since_ms else {
        return Freshness::Fresh;
    };

    let not_modified = match mode {
        ConditionalMode::Exact => since_ms == last_modified_ms,
        ConditionalMode::Since => last_modified_ms.div_euclid(1000) * 1000 <= since_ms,
    };

    if not_modified {
        Freshness::NotModified
    } else {
        Freshness::Fresh
    }
}

/// Parse a cache validation header into millis since the epoch
///
/// Anything after the first `;` (e.g. `; length=1234`) is dropped. Returns
/// `None` when no supported date form matches.
pub fn parse_validation_header(value: &str) -> Option<i64> {
    let value = value.split(';').next().unwrap_or_default().trim();
    parse_date(value).map(|date| date.timestamp_millis())
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    // IMF-fixdate and RFC 2822: "Sun, 06 Nov 1994 08:49:37 GMT"
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }

    // RFC 850: "Sunday, 06-Nov-94 08:49:37 GMT"
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%A, %d-%b-%y %H:%M:%S GMT") {
        return Some(date.and_utc());
    }

    // asctime: "Sun Nov  6 08:49:37 1994"
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%a %b %e %H:%M:%S %Y") {
        return Some(date.and_utc());
    }

    // Medium local date: "Nov 6, 1994", taken as local midnight
    let date = NaiveDate::parse_from_str(value, "%b %d, %Y").ok()?;
    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Format millis since the epoch as an IMF-fixdate
///
/// # Returns
/// e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
