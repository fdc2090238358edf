//! SQLite archive for normalized DSM2 scenario records.
//!
//! This crate persists the long-format tables produced by `sdg-dsm2` so
//! that exported model runs can be compared across scenarios without
//! re-reading the raw containers. The CLI opens a file-backed archive;
//! tests and ad-hoc use run fully in memory.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper so one archive handle can be
//!   cloned and shared across command steps
//! - records are keyed `(scenario, datetime, identifier, parameter)`;
//!   re-inserting an already archived run is a no-op, so exports can be
//!   repeated safely
//! - typed query methods returning serializable structs from [`models`]
//!
//! # Usage
//!
//! ```rust
//! use sdg_db::Database;
//! use sdg_dsm2::dates::parse_datetime;
//! use sdg_dsm2::record::{TimeSeriesRecord, TimeSeriesTable};
//!
//! let table = TimeSeriesTable::from_records(vec![TimeSeriesRecord {
//!     datetime: parse_datetime("2016-01-01 00:00:00").unwrap(),
//!     identifier: "GLC_FLOW_FISH".to_string(),
//!     parameter: "device-flow".to_string(),
//!     value: 120.0,
//!     unit: "CFS".to_string(),
//! }]);
//!
//! let db = Database::new().unwrap();
//! db.insert_records("base", &table).unwrap();
//!
//! let scenarios = db.list_scenarios().unwrap();
//! assert_eq!(scenarios[0].name, "base");
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `scenarios` - one row per named model run
//! - `records` - normalized samples (datetime, identifier, parameter,
//!   value, unit) keyed by scenario

pub mod schema;
mod loader;
mod queries;
pub mod models;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use rusqlite::Connection;

/// SQLite archive of normalized scenario records.
///
/// Cheaply cloneable (via `Rc`); clones share the same underlying
/// connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory archive with the full schema applied.
    ///
    /// The archive is empty after creation; use
    /// [`insert_records`](Self::insert_records) to populate it.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Open a file-backed archive, creating the file and schema if needed.
    ///
    /// The schema uses `IF NOT EXISTS` throughout, so opening an existing
    /// archive leaves its contents untouched.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdg_dsm2::dates::parse_datetime;
    use sdg_dsm2::record::{TimeSeriesRecord, TimeSeriesTable};

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        let scenarios = db.list_scenarios().unwrap();
        assert!(scenarios.is_empty(), "New archive should have no scenarios");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();

        let table = TimeSeriesTable::from_records(vec![TimeSeriesRecord {
            datetime: parse_datetime("2016-01-01 00:00:00").unwrap(),
            identifier: "GLC_FLOW_FISH".to_string(),
            parameter: "device-flow".to_string(),
            value: 120.0,
            unit: "CFS".to_string(),
        }]);
        db.insert_records("base", &table).unwrap();

        let scenarios = db2.list_scenarios().unwrap();
        assert_eq!(
            scenarios.len(),
            1,
            "Clone should see same data via shared Rc"
        );
    }
}
