//! Container export: normalize a DSM2 container file to long-format CSV.

use std::fs::File;
use std::path::Path;

use log::info;
use sdg_db::Database;
use sdg_dsm2::pathname::{PartFilter, PathFilter};
use sdg_dsm2::timeseries::read_timeseries;

use crate::parse_window;

/// Normalize one container file, write it as long-format CSV, and
/// optionally archive the rows under a scenario name.
///
/// The location and parameter filters combine per part: given together
/// they keep only the series matching both.
pub fn run_export(
    file: &Path,
    output: &Path,
    location_filter: Option<&str>,
    parameter_filter: Option<&str>,
    datetime_filter: Option<&str>,
    database_file: Option<&Path>,
    scenario: Option<&str>,
) -> anyhow::Result<()> {
    let filter = series_filter(location_filter, parameter_filter);
    let window = parse_window(datetime_filter)?;

    info!("exporting {} with filter {}", file.display(), filter);
    let table = read_timeseries(file, &filter)?.filter_window(&window);
    if table.is_empty() {
        info!("no rows matched, nothing written");
        return Ok(());
    }

    table.write_csv(File::create(output)?)?;
    info!("wrote {} record(s) to {}", table.len(), output.display());

    if let Some(db_path) = database_file {
        let name = match scenario {
            Some(name) => name.to_string(),
            None => file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "default".to_string()),
        };
        let db = Database::open(db_path)?;
        let inserted = db.insert_records(&name, &table)?;
        info!(
            "archived {} new record(s) under scenario '{}' in {}",
            inserted,
            name,
            db_path.display()
        );
    }
    Ok(())
}

/// Build the per-part filter from the CLI's comma separated lists.
fn series_filter(location_filter: Option<&str>, parameter_filter: Option<&str>) -> PathFilter {
    let mut filter = PathFilter::any();
    if let Some(spec) = location_filter {
        filter.parts[1] = one_of(spec);
    }
    if let Some(spec) = parameter_filter {
        filter.parts[2] = one_of(spec);
    }
    filter
}

fn one_of(spec: &str) -> PartFilter {
    PartFilter::OneOf(spec.split(',').map(|s| s.trim().to_string()).collect())
}
