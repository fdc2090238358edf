//! Typed query methods for retrieving archived scenario records.
//!
//! All queries return typed structs from [`crate::models`]. Datetimes
//! are stored as zero-padded ISO text, so the SQL layer can window and
//! order them with plain string comparison before they are parsed back
//! into `chrono` values.

use rusqlite::params;
use sdg_dsm2::dates::{format_datetime, parse_datetime, TimeWindow};

use crate::models::{DatetimeRange, ScenarioRow, SeriesPoint};
use crate::Database;

/// Render a window as inclusive text bounds for SQL comparison.
///
/// Unbounded sides fall back to sentinel strings that sort below and
/// above every storable datetime.
fn window_bounds(window: &TimeWindow) -> (String, String) {
    let start = window
        .start
        .map(|t| format_datetime(&t))
        .unwrap_or_else(|| "0000-01-01 00:00:00".to_string());
    let end = window
        .end
        .map(|t| format_datetime(&t))
        .unwrap_or_else(|| "9999-12-31 23:59:59".to_string());
    (start, end)
}

impl Database {
    /// List archived scenarios ordered by name.
    pub fn list_scenarios(&self) -> anyhow::Result<Vec<ScenarioRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT id, name FROM scenarios ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ScenarioRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: list_scenarios returned {} row(s)", rows.len());
        Ok(rows)
    }

    /// Get one sensor's series for a scenario, restricted to a window.
    ///
    /// Identifier and parameter match case-insensitively, mirroring the
    /// table filters in `sdg-dsm2`. Points come back in chronological
    /// order.
    pub fn query_series(
        &self,
        scenario: &str,
        identifier: &str,
        parameter: &str,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<SeriesPoint>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT r.datetime, r.value, r.unit
             FROM records r
             INNER JOIN scenarios s ON r.scenario_id = s.id
             WHERE s.name = ?1
               AND r.identifier = ?2 COLLATE NOCASE
               AND r.parameter = ?3 COLLATE NOCASE
               AND r.datetime >= ?4 AND r.datetime <= ?5
             ORDER BY r.datetime",
        )?;
        let (start, end) = window_bounds(window);
        let rows = stmt
            .query_map(params![scenario, identifier, parameter, start, end], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut points = Vec::with_capacity(rows.len());
        for (datetime, value, unit) in rows {
            points.push(SeriesPoint {
                datetime: parse_datetime(&datetime)?,
                value,
                unit,
            });
        }
        log::info!(
            "query: query_series({}, {}, {}) returned {} point(s)",
            scenario,
            identifier,
            parameter,
            points.len()
        );
        Ok(points)
    }

    /// Get the inclusive datetime coverage of a scenario's records.
    ///
    /// Returns `None` when the scenario is unknown or has no records.
    pub fn query_datetime_range(&self, scenario: &str) -> anyhow::Result<Option<DatetimeRange>> {
        let conn = self.conn.borrow();
        let (min, max): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(r.datetime), MAX(r.datetime)
             FROM records r
             INNER JOIN scenarios s ON r.scenario_id = s.id
             WHERE s.name = ?1",
            params![scenario],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some(DatetimeRange {
                start: parse_datetime(&min)?,
                end: parse_datetime(&max)?,
            })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdg_dsm2::record::{TimeSeriesRecord, TimeSeriesTable};

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

    /// Archive with one scenario spanning three quarter hours.
    fn sample_db() -> Database {
        let db = Database::new().unwrap();
        let table = TimeSeriesTable::from_records(vec![
            record("2016-01-01 00:00:00", "GLC_FLOW_FISH", "device-flow", 120.0, "CFS"),
            record("2016-01-01 00:15:00", "GLC_FLOW_FISH", "device-flow", 140.0, "CFS"),
            record("2016-01-01 00:30:00", "GLC_FLOW_FISH", "device-flow", 160.0, "CFS"),
            record("2016-01-01 00:00:00", "GLC_GATE_UP", "stage", 2.0, "FEET"),
        ]);
        db.insert_records("base", &table).unwrap();
        db
    }

    fn window(text: &str) -> TimeWindow {
        TimeWindow::parse(text).unwrap()
    }

    // ───────────────────── list_scenarios ─────────────────────

    #[test]
    fn scenarios_list_in_name_order() {
        let db = sample_db();
        db.ensure_scenario("alt-2").unwrap();
        db.ensure_scenario("alt-1").unwrap();

        let names: Vec<String> = db
            .list_scenarios()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["alt-1", "alt-2", "base"]);
    }

    // ───────────────────── query_series ─────────────────────

    #[test]
    fn series_points_come_back_in_chronological_order() {
        let db = sample_db();
        let points = db
            .query_series("base", "GLC_FLOW_FISH", "device-flow", &TimeWindow::unbounded())
            .unwrap();
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![120.0, 140.0, 160.0]);
        assert!(points.windows(2).all(|w| w[0].datetime < w[1].datetime));
    }

    #[test]
    fn series_round_trips_value_and_unit() {
        let db = sample_db();
        let points = db
            .query_series("base", "GLC_GATE_UP", "stage", &TimeWindow::unbounded())
            .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].datetime, parse_datetime("2016-01-01 00:00:00").unwrap());
        assert_eq!(points[0].value, 2.0);
        assert_eq!(points[0].unit, "FEET");
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let db = sample_db();
        let points = db
            .query_series(
                "base",
                "GLC_FLOW_FISH",
                "device-flow",
                &window("2016-01-01 00:15,2016-01-01 00:30"),
            )
            .unwrap();
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![140.0, 160.0]);
    }

    #[test]
    fn half_open_window_keeps_everything_from_start() {
        let db = sample_db();
        let points = db
            .query_series(
                "base",
                "GLC_FLOW_FISH",
                "device-flow",
                &window("2016-01-01 00:15,"),
            )
            .unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn identifier_and_parameter_match_case_insensitively() {
        let db = sample_db();
        let points = db
            .query_series("base", "glc_flow_fish", "DEVICE-FLOW", &TimeWindow::unbounded())
            .unwrap();
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn unknown_scenario_returns_no_points() {
        let db = sample_db();
        let points = db
            .query_series("missing", "GLC_FLOW_FISH", "device-flow", &TimeWindow::unbounded())
            .unwrap();
        assert!(points.is_empty());
    }

    // ───────────────────── query_datetime_range ─────────────────────

    #[test]
    fn datetime_range_spans_min_and_max() {
        let db = sample_db();
        let range = db.query_datetime_range("base").unwrap().unwrap();
        assert_eq!(range.start, parse_datetime("2016-01-01 00:00:00").unwrap());
        assert_eq!(range.end, parse_datetime("2016-01-01 00:30:00").unwrap());
    }

    #[test]
    fn datetime_range_of_unknown_scenario_is_none() {
        let db = sample_db();
        assert!(db.query_datetime_range("missing").unwrap().is_none());
    }

    #[test]
    fn datetime_range_of_empty_scenario_is_none() {
        let db = sample_db();
        db.ensure_scenario("empty").unwrap();
        assert!(db.query_datetime_range("empty").unwrap().is_none());
    }
}
