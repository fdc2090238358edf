//! Normalized long-format time series records and tables.

use std::io;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::dates::{format_datetime, TimeWindow};
use crate::error::Result;

/// One normalized sample from a DSM2 export.
///
/// `identifier` is the B part of the source pathname (sensor or node),
/// `parameter` is the lowercased C part, and `unit` the engineering unit
/// reported by the export or derived from the parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRecord {
    pub datetime: NaiveDateTime,
    pub identifier: String,
    pub parameter: String,
    pub value: f64,
    pub unit: String,
}

/// A bare (datetime, value) sample extracted from a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    pub datetime: NaiveDateTime,
    pub value: f64,
}

/// An ordered collection of normalized records.
///
/// Rows are kept sorted by (identifier, parameter, datetime) and
/// deduplicated on that key; downstream joins rely on each identifier's
/// samples being in ascending datetime order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    records: Vec<TimeSeriesRecord>,
}

impl TimeSeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records in any order, sorting and deduplicating.
    pub fn from_records(mut records: Vec<TimeSeriesRecord>) -> Self {
        records.sort_by(|a, b| {
            (&a.identifier, &a.parameter, a.datetime).cmp(&(&b.identifier, &b.parameter, b.datetime))
        });
        records.dedup_by(|a, b| {
            a.identifier == b.identifier && a.parameter == b.parameter && a.datetime == b.datetime
        });
        Self { records }
    }

    pub fn records(&self) -> &[TimeSeriesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep rows whose identifier is one of `ids` (case-insensitive).
    pub fn filter_identifiers(&self, ids: &[&str]) -> Self {
        self.retain(|r| ids.iter().any(|id| id.eq_ignore_ascii_case(&r.identifier)))
    }

    /// Keep rows for a single identifier (case-insensitive).
    pub fn filter_identifier(&self, id: &str) -> Self {
        self.retain(|r| r.identifier.eq_ignore_ascii_case(id))
    }

    /// Keep rows measuring `parameter` (case-insensitive).
    pub fn filter_parameter(&self, parameter: &str) -> Self {
        self.retain(|r| r.parameter.eq_ignore_ascii_case(parameter))
    }

    /// Keep rows reported in `unit` (case-sensitive; units are normalized
    /// uppercase on read).
    pub fn filter_unit(&self, unit: &str) -> Self {
        self.retain(|r| r.unit == unit)
    }

    /// Keep rows whose timestamp falls inside `window`.
    pub fn filter_window(&self, window: &TimeWindow) -> Self {
        if window.is_unbounded() {
            return self.clone();
        }
        self.retain(|r| window.contains(r.datetime))
    }

    /// Rename identifiers through an alias map; identifiers without an
    /// alias pass through unchanged.
    pub fn rename_identifiers(&self, aliases: &[(&str, &str)]) -> Self {
        let renamed = self
            .records
            .iter()
            .map(|r| {
                let mut record = r.clone();
                if let Some((_, to)) = aliases
                    .iter()
                    .find(|(from, _)| from.eq_ignore_ascii_case(&r.identifier))
                {
                    record.identifier = to.to_string();
                }
                record
            })
            .collect();
        Self::from_records(renamed)
    }

    /// Distinct identifiers in table order.
    pub fn identifiers(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.identifier) {
                seen.push(r.identifier.clone());
            }
        }
        seen
    }

    /// Extract the (datetime, value) series for one identifier, in
    /// ascending datetime order.
    pub fn series(&self, id: &str) -> Vec<TimeSample> {
        self.records
            .iter()
            .filter(|r| r.identifier.eq_ignore_ascii_case(id))
            .map(|r| TimeSample {
                datetime: r.datetime,
                value: r.value,
            })
            .collect()
    }

    /// Write the table as CSV with a `datetime,identifier,parameter,value,unit`
    /// header row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["datetime", "identifier", "parameter", "value", "unit"])?;
        for r in &self.records {
            wtr.write_record(&[
                format_datetime(&r.datetime),
                r.identifier.clone(),
                r.parameter.clone(),
                r.value.to_string(),
                r.unit.clone(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn retain<F: Fn(&TimeSeriesRecord) -> bool>(&self, keep: F) -> Self {
        Self {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
