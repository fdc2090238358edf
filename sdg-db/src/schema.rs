//! SQL schema definitions for the scenario archive.
//!
//! Contains CREATE TABLE statements for the scenario and record tables.
//! The schema is applied as a single batch when the archive is opened.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `scenarios` - one row per named model run (`id`, unique `name`)
/// - `records` - normalized samples keyed by
///   `(scenario_id, datetime, identifier, parameter)`;
///   the composite key is what makes re-inserting an already archived
///   run a no-op
///
/// Datetimes are stored as zero-padded `YYYY-MM-DD HH:MM:SS` text, so
/// lexicographic comparison in SQL matches chronological order.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS scenarios (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS records (
        scenario_id INTEGER NOT NULL,
        datetime TEXT NOT NULL,
        identifier TEXT NOT NULL,
        parameter TEXT NOT NULL,
        value REAL NOT NULL,
        unit TEXT NOT NULL,
        PRIMARY KEY (scenario_id, datetime, identifier, parameter)
    );
    CREATE INDEX IF NOT EXISTS idx_records_scenario ON records(scenario_id);
    CREATE INDEX IF NOT EXISTS idx_records_identifier ON records(identifier);
    CREATE INDEX IF NOT EXISTS idx_records_datetime ON records(datetime);

    "#
}
