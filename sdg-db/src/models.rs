//! Query result model structs for archived scenario records.
//!
//! All structs derive `Serialize` so command-layer callers can dump
//! query results as JSON without further conversion.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A scenario row from the archive.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioRow {
    pub id: i64,
    pub name: String,
}

/// One stored sample returned by series queries.
///
/// The `unit` field carries whatever the source export reported
/// (`CFS`, `FEET`, or empty when the parameter had no mapped unit).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub datetime: NaiveDateTime,
    pub value: f64,
    pub unit: String,
}

/// Inclusive datetime coverage of one scenario's records.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DatetimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}
