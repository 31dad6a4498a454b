//! Timestamp handling for trip-planner records.
//!
//! The backend sends naive local timestamps such as `"2024-03-15T10:42:00"`.
//! There is no timezone suffix, so everything here works in
//! `NaiveDateTime`.

use chrono::{NaiveDateTime, Timelike};

/// Literal format of every timestamp in a trip-planner record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Error returned when parsing an invalid timestamp literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {literal:?}: {reason}")]
pub struct TimeError {
    literal: String,
    reason: String,
}

impl TimeError {
    /// The literal that failed to parse.
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

/// Parse a `yyyy-MM-ddTHH:mm:ss` timestamp.
///
/// # Examples
///
/// ```
/// use trip_ranker::domain::parse_timestamp;
/// use chrono::Timelike;
///
/// let t = parse_timestamp("2024-03-15T10:42:07").unwrap();
/// assert_eq!((t.hour(), t.minute(), t.second()), (10, 42, 7));
///
/// // Timezone suffixes and date-only values are rejected
/// assert!(parse_timestamp("2024-03-15T10:42:07Z").is_err());
/// assert!(parse_timestamp("2024-03-15").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimeError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).map_err(|e| TimeError {
        literal: s.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a timestamp, degrading to `fallback` when the literal is unparseable.
///
/// Plans with a garbled time are still worth showing, so callers use this
/// for literals that are present but malformed. A missing literal is a
/// different failure and is reported by the caller.
pub fn parse_timestamp_or(s: &str, fallback: NaiveDateTime) -> NaiveDateTime {
    match parse_timestamp(s) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(literal = %e.literal(), "unparseable timestamp, using reference time");
            fallback
        }
    }
}

/// Format a timestamp as "HH:MM" for display.
pub fn format_clock(t: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Whole minutes in a number of seconds, rounded down.
pub fn whole_minutes(seconds: i64) -> i64 {
    seconds.div_euclid(60)
}
