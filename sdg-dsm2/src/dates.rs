//! Timestamp parsing shared across the toolkit.
//!
//! Exported containers carry timestamps as `YYYY-MM-DD HH:MM:SS` or
//! `YYYY-MM-DD HH:MM`; CLI filters additionally accept bare dates,
//! which stand for midnight of that day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Dsm2Error, Result};

/// Timestamp format used when writing containers and reports
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format without seconds, accepted on input
pub const DATETIME_FORMAT_SHORT: &str = "%Y-%m-%d %H:%M";

/// Calendar date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp, accepting the long form, the short form, and a
/// bare date (interpreted as midnight).
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT_SHORT))
        .or_else(|_| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| Dsm2Error::DatetimeParse(trimmed.to_string()))
}

/// Format a timestamp in the toolkit's output form
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Inclusive datetime window with optional open ends.
///
/// The CLI filter syntax is `start,end` where either side may be empty:
/// `2016-01-01,2016-12-31`, `2016-01-01,` (from start onward) or
/// `,2016-12-31` (everything up to end). Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeWindow {
    /// Window spanning all time
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Parse a `start,end` expression where either side may be empty.
    pub fn parse(text: &str) -> Result<Self> {
        let Some((start_text, end_text)) = text.split_once(',') else {
            return Err(Dsm2Error::InvalidWindow {
                text: text.to_string(),
                reason: "expected `start,end` with either side optionally empty".to_string(),
            });
        };
        let start = match start_text.trim() {
            "" => None,
            s => Some(parse_datetime(s)?),
        };
        let end = match end_text.trim() {
            "" => None,
            s => Some(parse_datetime(s)?),
        };
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return Err(Dsm2Error::InvalidWindow {
                    text: text.to_string(),
                    reason: "end precedes start".to_string(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// True when `ts` falls inside the window, both bounds inclusive.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}
