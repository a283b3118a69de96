//! In-memory SQLite dataset registry for watershed ET dashboard data.
//!
//! Every configured watershed contributes up to three independently loaded
//! sub-tables: a daily ET series, a daily discharge series and a layer of
//! cell polygons already reprojected to WGS84. The registry is filled once at
//! startup and only read afterwards.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite` (compiles to WASM via `wasm32-unknown-unknown`)
//! - Sources read through a [`wsd_core::SourceReader`], so the web app can serve
//!   bytes embedded at compile time while the CLI reads from disk
//! - Typed query methods returning serializable structs
//!
//! # Usage
//!
//! ```rust
//! use wsd_core::{DashboardConfig, MemoryReader, WatershedConfig};
//! use wsd_db::Database;
//!
//! let reader = MemoryReader::new().with(
//!     "et.csv",
//!     "Date,Model_calculated_ET,MODIS_ET,Noah_LSM_ET\n2015-06-01,3.1,2.8,2.9\n",
//! );
//! let config = DashboardConfig {
//!     watersheds: vec![WatershedConfig {
//!         name: "Yackanookany".into(),
//!         et: Some("et.csv".into()),
//!         discharge: None,
//!         geometry: None,
//!         geometry_crs: None,
//!     }],
//!     ..Default::default()
//! };
//!
//! let db = Database::new().unwrap();
//! db.load_watersheds_with(&config, &reader).unwrap();
//! assert_eq!(db.et_years("Yackanookany").unwrap(), vec![2015]);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod loader;
mod queries;
pub mod models;

pub use loader::LoadReport;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite registry of watershed datasets.
///
/// This struct is cheaply cloneable (via `Rc`) and suitable for sharing
/// across Dioxus components in a single-threaded WASM environment.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use
    /// [`load_watersheds`](Self::load_watersheds) to populate it.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsd_core::{DashboardConfig, MemoryReader, WatershedConfig};

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        let config = DashboardConfig {
            watersheds: vec![WatershedConfig {
                name: "Pearl".into(),
                et: None,
                discharge: None,
                geometry: None,
                geometry_crs: None,
            }],
            ..Default::default()
        };
        db.load_watersheds_with(&config, &MemoryReader::new()).unwrap();
        assert_eq!(
            db2.watershed_names().unwrap(),
            vec!["Pearl"],
            "Clone should see same data via shared Rc"
        );
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        assert!(db.watershed_names().unwrap().is_empty());
    }
}
