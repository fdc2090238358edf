//! Insert methods for archiving normalized scenario tables.
//!
//! Inserts are keyed on `(scenario_id, datetime, identifier, parameter)`
//! with `ON CONFLICT DO NOTHING`, so re-archiving a scenario that is
//! already present leaves the stored rows untouched and simply reports
//! everything as ignored.

use rusqlite::params;
use sdg_dsm2::dates::format_datetime;
use sdg_dsm2::record::TimeSeriesTable;

use crate::Database;

impl Database {
    /// Return the id of the named scenario, inserting the row if absent.
    pub fn ensure_scenario(&self, name: &str) -> anyhow::Result<i64> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO scenarios (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        let id = conn.query_row(
            "SELECT id FROM scenarios WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Archive a normalized table under the named scenario.
    ///
    /// Returns the number of rows actually inserted; rows whose key is
    /// already archived are ignored.
    pub fn insert_records(&self, scenario: &str, table: &TimeSeriesTable) -> anyhow::Result<u32> {
        let scenario_id = self.ensure_scenario(scenario)?;
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "INSERT INTO records (scenario_id, datetime, identifier, parameter, value, unit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(scenario_id, datetime, identifier, parameter) DO NOTHING",
        )?;

        let mut count = 0u32;
        let mut ignored = 0u32;
        for r in table.records() {
            let changed = stmt.execute(params![
                scenario_id,
                format_datetime(&r.datetime),
                r.identifier,
                r.parameter,
                r.value,
                r.unit,
            ])?;
            if changed == 0 {
                ignored += 1;
            } else {
                count += 1;
            }
        }
        log::info!(
            "loader: archived {} record(s) for scenario '{}', {} duplicate(s) ignored",
            count,
            scenario,
            ignored
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use sdg_dsm2::dates::{parse_datetime, TimeWindow};
    use sdg_dsm2::record::{TimeSeriesRecord, TimeSeriesTable};

    use crate::Database;

    /// Build one normalized record from literal parts.
    fn record(
        datetime: &str,
        identifier: &str,
        parameter: &str,
        value: f64,
        unit: &str,
    ) -> TimeSeriesRecord {
        TimeSeriesRecord {
            datetime: parse_datetime(datetime).unwrap(),
            identifier: identifier.to_string(),
            parameter: parameter.to_string(),
            value,
            unit: unit.to_string(),
        }
    }

    /// A small two-sensor table covering one hour.
    fn sample_table() -> TimeSeriesTable {
        TimeSeriesTable::from_records(vec![
            record("2016-01-01 00:00:00", "GLC_FLOW_FISH", "device-flow", 120.0, "CFS"),
            record("2016-01-01 00:15:00", "GLC_FLOW_FISH", "device-flow", 140.0, "CFS"),
            record("2016-01-01 00:00:00", "GLC_GATE_UP", "stage", 2.0, "FEET"),
            record("2016-01-01 00:15:00", "GLC_GATE_UP", "stage", 2.1, "FEET"),
        ])
    }

    #[test]
    fn inserting_records_returns_row_count() {
        let db = Database::new().unwrap();
        let count = db.insert_records("base", &sample_table()).unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn ensure_scenario_is_idempotent() {
        let db = Database::new().unwrap();
        let first = db.ensure_scenario("base").unwrap();
        let second = db.ensure_scenario("base").unwrap();
        assert_eq!(first, second, "Same name should map to same id");
    }

    #[test]
    fn reinserting_a_table_ignores_every_row() {
        let db = Database::new().unwrap();
        db.insert_records("base", &sample_table()).unwrap();

        let second = db.insert_records("base", &sample_table()).unwrap();
        assert_eq!(second, 0, "Duplicate keys should be ignored");

        let points = db
            .query_series("base", "GLC_FLOW_FISH", "device-flow", &TimeWindow::unbounded())
            .unwrap();
        assert_eq!(points.len(), 2, "Stored rows should be unchanged");
    }

    #[test]
    fn scenarios_with_identical_keys_do_not_collide() {
        let db = Database::new().unwrap();
        db.insert_records("base", &sample_table()).unwrap();
        let count = db.insert_records("raised-gates", &sample_table()).unwrap();
        assert_eq!(count, 4, "Second scenario should insert all rows");

        for scenario in ["base", "raised-gates"] {
            let points = db
                .query_series(scenario, "GLC_GATE_UP", "stage", &TimeWindow::unbounded())
                .unwrap();
            assert_eq!(points.len(), 2, "Scenario '{}' should keep its rows", scenario);
        }
    }

    #[test]
    fn reinsert_with_changed_value_keeps_the_archived_row() {
        let db = Database::new().unwrap();
        db.insert_records("base", &sample_table()).unwrap();

        let revised = TimeSeriesTable::from_records(vec![record(
            "2016-01-01 00:00:00",
            "GLC_FLOW_FISH",
            "device-flow",
            999.0,
            "CFS",
        )]);
        let count = db.insert_records("base", &revised).unwrap();
        assert_eq!(count, 0);

        let points = db
            .query_series("base", "GLC_FLOW_FISH", "device-flow", &TimeWindow::unbounded())
            .unwrap();
        assert_eq!(points[0].value, 120.0, "First archived value should win");
    }
}
