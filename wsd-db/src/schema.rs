//! SQL schema for the in-memory dataset registry.
//!
//! Applied as a single batch when the database is created.

/// Returns the full SQL schema as a single batch string.
///
/// **Registry tables:**
/// - `watersheds` - Registered names in configuration order
/// - `sources` - Load outcome of each (watershed, sub-table) pair
///
/// **Series tables:**
/// - `et_series` - Daily ET values (mm/day), `year` derived at load, other
///   columns as a JSON array of text
/// - `et_columns` - The ET file's headers in file order, `year` excluded
/// - `discharge_series` - Daily discharge values (m³/s), absent columns NULL
/// - `discharge_columns` - Which discharge columns each file carried
///
/// **Geometry tables:**
/// - `cells` - Cell attributes and WGS84 geometry as JSON text
/// - `cell_columns` - Attribute names in first-appearance order
/// - `cell_bounds` - Cached lon/lat bounding box per watershed
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS watersheds (
        name TEXT PRIMARY KEY,
        position INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sources (
        watershed TEXT NOT NULL,
        kind TEXT NOT NULL,
        path TEXT,
        loaded INTEGER NOT NULL,
        rows INTEGER NOT NULL DEFAULT 0,
        message TEXT,
        PRIMARY KEY (watershed, kind)
    );

    CREATE TABLE IF NOT EXISTS et_series (
        watershed TEXT NOT NULL,
        seq INTEGER NOT NULL,
        date TEXT NOT NULL,
        year INTEGER NOT NULL,
        model_et REAL,
        modis_et REAL,
        noah_et REAL,
        extra TEXT NOT NULL DEFAULT '[]',
        PRIMARY KEY (watershed, seq)
    );
    CREATE INDEX IF NOT EXISTS idx_et_year ON et_series(watershed, year);

    CREATE TABLE IF NOT EXISTS et_columns (
        watershed TEXT NOT NULL,
        position INTEGER NOT NULL,
        column_name TEXT NOT NULL,
        PRIMARY KEY (watershed, position)
    );

    CREATE TABLE IF NOT EXISTS discharge_series (
        watershed TEXT NOT NULL,
        seq INTEGER NOT NULL,
        date TEXT NOT NULL,
        year INTEGER NOT NULL,
        usgs_runoff_cms REAL,
        runoff_no_et_cms REAL,
        runoff_modis_et_cms REAL,
        runoff_noah_et_cms REAL,
        PRIMARY KEY (watershed, seq)
    );
    CREATE INDEX IF NOT EXISTS idx_discharge_year ON discharge_series(watershed, year);

    CREATE TABLE IF NOT EXISTS discharge_columns (
        watershed TEXT NOT NULL,
        position INTEGER NOT NULL,
        column_name TEXT NOT NULL,
        PRIMARY KEY (watershed, position)
    );

    CREATE TABLE IF NOT EXISTS cells (
        watershed TEXT NOT NULL,
        seq INTEGER NOT NULL,
        properties TEXT NOT NULL,
        geometry TEXT,
        PRIMARY KEY (watershed, seq)
    );

    CREATE TABLE IF NOT EXISTS cell_columns (
        watershed TEXT NOT NULL,
        position INTEGER NOT NULL,
        column_name TEXT NOT NULL,
        PRIMARY KEY (watershed, position)
    );

    CREATE TABLE IF NOT EXISTS cell_bounds (
        watershed TEXT PRIMARY KEY,
        min_lon REAL NOT NULL,
        min_lat REAL NOT NULL,
        max_lon REAL NOT NULL,
        max_lat REAL NOT NULL,
        source_crs TEXT NOT NULL
    );
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        let expected_tables = [
            "watersheds",
            "sources",
            "et_series",
            "discharge_series",
            "discharge_columns",
            "cells",
            "cell_columns",
            "cell_bounds",
        ];

        for table in &expected_tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table '{}' should exist", table);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
