//! Reader for exported DSM2 time-series containers.
//!
//! A container is a CSV file with columns `path,datetime,value,unit`
//! (`unit` may be absent) where `path` is the six-part pathname of the
//! series the row belongs to. Reading applies a [`PathFilter`] first,
//! then normalizes matching rows into the long-format table: the
//! pathname's B part becomes `identifier`, the lowercased C part becomes
//! `parameter`, and missing units are derived from the parameter.
//!
//! Rows that fail to parse are skipped with a warning rather than
//! aborting the read; a container of the wrong kind surfaces downstream
//! as an empty filtered table.

use std::path::Path;

use crate::error::{Dsm2Error, Result};
use crate::pathname::{PathFilter, Pathname};
use crate::record::{TimeSeriesRecord, TimeSeriesTable};

/// Engineering units derived from the parameter when the container has
/// no unit column. Parameters outside this map get an empty unit.
pub const PARAM_TO_UNIT: [(&str, &str); 3] = [
    ("flow", "CFS"),
    ("device-flow", "CFS"),
    ("stage", "FEET"),
];

/// Unit for a parameter per [`PARAM_TO_UNIT`], or `""` when unmapped.
pub fn unit_for_parameter(parameter: &str) -> &'static str {
    PARAM_TO_UNIT
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(parameter))
        .map(|(_, unit)| *unit)
        .unwrap_or("")
}

/// Parse container CSV text, keeping rows whose pathname matches `filter`.
pub fn parse_timeseries(csv_text: &str, filter: &PathFilter) -> Result<TimeSeriesTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut records = Vec::new();
    let mut skipped = 0u32;
    for row in rdr.records() {
        let r = row?;
        let path_text = r.get(0).unwrap_or("").trim();
        let datetime_text = r.get(1).unwrap_or("").trim();
        let value_text = r.get(2).unwrap_or("").trim();
        let unit_text = r.get(3).unwrap_or("").trim();

        let path: Pathname = match path_text.parse() {
            Ok(p) => p,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if !filter.matches(&path) {
            continue;
        }

        let datetime = match crate::dates::parse_datetime(datetime_text) {
            Ok(dt) => dt,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        // Missing-value markers parse as NaN or fail outright; either way
        // the row carries no usable sample.
        let value = match value_text.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let parameter = path.parameter().to_ascii_lowercase();
        let unit = if unit_text.is_empty() {
            unit_for_parameter(&parameter).to_string()
        } else {
            unit_text.to_uppercase()
        };
        records.push(TimeSeriesRecord {
            datetime,
            identifier: path.identifier().to_string(),
            parameter,
            value,
            unit,
        });
    }

    if skipped > 0 {
        log::warn!("container: skipped {} unparseable rows", skipped);
    }
    Ok(TimeSeriesTable::from_records(records))
}

/// Read a container file and normalize the rows matching `filter`.
pub fn read_timeseries(path: &Path, filter: &PathFilter) -> Result<TimeSeriesTable> {
    let text = std::fs::read_to_string(path).map_err(|source| Dsm2Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_timeseries(&text, filter)?;
    log::info!(
        "container: {} rows matched {} in {}",
        table.len(),
        filter,
        path.display()
    );
    Ok(table)
}
