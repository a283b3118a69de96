//! Typed query methods over the loaded registry.
//!
//! Year queries return rows ordered by date, then by their position in the
//! source file so duplicate dates keep a stable order.

use anyhow::Context;
use rusqlite::{params, OptionalExtension};
use wsd_core::{DischargeColumn, GeoBoundingBox, SourceKind};

use crate::models::{CellExtent, CellRow, DischargeRow, DischargeYear, EtRow, SourceStatus};
use crate::Database;

impl Database {
    /// Registered watershed names in configuration order.
    pub fn watershed_names(&self) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT name FROM watersheds ORDER BY position")?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// Load outcome of every (watershed, source) pair.
    pub fn source_statuses(&self) -> anyhow::Result<Vec<SourceStatus>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT s.watershed, s.kind, s.path, s.loaded, s.rows, s.message
             FROM sources s
             INNER JOIN watersheds w ON s.watershed = w.name
             ORDER BY w.position,
                      CASE s.kind WHEN 'et' THEN 0 WHEN 'discharge' THEN 1 ELSE 2 END",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(watershed, kind, path, loaded, rows, message)| {
                let kind = SourceKind::parse(&kind)
                    .with_context(|| format!("unknown source kind '{}'", kind))?;
                Ok(SourceStatus {
                    watershed,
                    kind,
                    path,
                    loaded,
                    rows: rows as usize,
                    message,
                })
            })
            .collect()
    }

    /// True when the given source loaded successfully.
    pub fn has_source(&self, watershed: &str, kind: SourceKind) -> anyhow::Result<bool> {
        let conn = self.conn.borrow();
        let loaded: Option<bool> = conn
            .query_row(
                "SELECT loaded FROM sources WHERE watershed = ?1 AND kind = ?2",
                params![watershed, kind.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(loaded.unwrap_or(false))
    }

    /// Distinct calendar years in a watershed's ET series, ascending.
    pub fn et_years(&self, watershed: &str) -> anyhow::Result<Vec<i32>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT year FROM et_series WHERE watershed = ?1 ORDER BY year",
        )?;
        let years = stmt
            .query_map(params![watershed], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(years)
    }

    /// Headers of the watershed's ET file in file order, without `year`.
    pub fn et_columns(&self, watershed: &str) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT column_name FROM et_columns WHERE watershed = ?1 ORDER BY position",
        )?;
        let names = stmt
            .query_map(params![watershed], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// ET rows of one watershed and year, sorted by date.
    pub fn query_et_year(&self, watershed: &str, year: i32) -> anyhow::Result<Vec<EtRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT date, model_et, modis_et, noah_et, extra FROM et_series
             WHERE watershed = ?1 AND year = ?2
             ORDER BY date, seq",
        )?;
        let raw = stmt
            .query_map(params![watershed, year], |row| {
                Ok((
                    EtRow {
                        date: row.get(0)?,
                        model_et: row.get(1)?,
                        modis_et: row.get(2)?,
                        noah_et: row.get(3)?,
                        extra: Vec::new(),
                    },
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let rows = raw
            .into_iter()
            .map(|(row, extra)| {
                Ok(EtRow {
                    extra: serde_json::from_str(&extra).context("corrupt ET extra columns")?,
                    ..row
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::debug!(
            "query: query_et_year({}, {}) returned {} records",
            watershed,
            year,
            rows.len()
        );
        Ok(rows)
    }

    /// Discharge columns the watershed's file carried, in candidate order.
    pub fn discharge_columns(&self, watershed: &str) -> anyhow::Result<Vec<DischargeColumn>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT column_name FROM discharge_columns WHERE watershed = ?1 ORDER BY position",
        )?;
        let names = stmt
            .query_map(params![watershed], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        names
            .iter()
            .map(|n| {
                DischargeColumn::from_header(n)
                    .with_context(|| format!("unknown discharge column '{}'", n))
            })
            .collect()
    }

    /// Discharge rows of one watershed and year, restricted to present columns.
    pub fn query_discharge_year(
        &self,
        watershed: &str,
        year: i32,
    ) -> anyhow::Result<DischargeYear> {
        let columns = self.discharge_columns(watershed)?;
        let mut select = String::from("SELECT date");
        for column in &columns {
            select.push_str(", ");
            select.push_str(column.sql_column());
        }
        select.push_str(
            " FROM discharge_series WHERE watershed = ?1 AND year = ?2 ORDER BY date, seq",
        );

        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&select)?;
        let n = columns.len();
        let rows = stmt
            .query_map(params![watershed, year], |row| {
                let mut values = Vec::with_capacity(n);
                for i in 0..n {
                    values.push(row.get::<_, Option<f64>>(i + 1)?);
                }
                Ok(DischargeRow {
                    date: row.get(0)?,
                    values,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "query: query_discharge_year({}, {}) returned {} records",
            watershed,
            year,
            rows.len()
        );
        Ok(DischargeYear { columns, rows })
    }

    /// Attribute names of a watershed's cells in first-appearance order.
    pub fn cell_columns(&self, watershed: &str) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT column_name FROM cell_columns WHERE watershed = ?1 ORDER BY position",
        )?;
        let names = stmt
            .query_map(params![watershed], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Every cell of a watershed in file order.
    pub fn query_cells(&self, watershed: &str) -> anyhow::Result<Vec<CellRow>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT properties, geometry FROM cells WHERE watershed = ?1 ORDER BY seq",
        )?;
        let raw = stmt
            .query_map(params![watershed], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(properties, geometry)| {
                Ok(CellRow {
                    properties: serde_json::from_str(&properties)
                        .context("corrupt cell properties")?,
                    geometry: geometry
                        .map(|g| serde_json::from_str(&g))
                        .transpose()
                        .context("corrupt cell geometry")?,
                })
            })
            .collect()
    }

    /// Cached WGS84 extent, `None` if the layer had no coordinates or did not load.
    pub fn cell_bounds(&self, watershed: &str) -> anyhow::Result<Option<CellExtent>> {
        let conn = self.conn.borrow();
        let extent = conn
            .query_row(
                "SELECT min_lon, min_lat, max_lon, max_lat, source_crs
                 FROM cell_bounds WHERE watershed = ?1",
                params![watershed],
                |row| {
                    Ok(CellExtent {
                        bounds: GeoBoundingBox::new(
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                        ),
                        source_crs: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(extent)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use wsd_core::{DashboardConfig, DischargeColumn, MemoryReader, SourceKind, WatershedConfig};

    const ET_CSV: &str = "\
Date,Model_aclculated_ET,MODIS_ET,Noah_LSM_ET
2016-01-02,1.2,1.0,1.1
2015-12-31,0.5,0.4,
2016-01-01,1.5,1.3,1.4
2016-01-01,1.6,1.2,1.3
2017-07-04,3.0,2.5,2.8
";

    const DISCHARGE_CSV: &str = "\
Date,Runoff_MODIS_ET_cms,USGS_Runoff_cms
2016-01-02,4.1,4.0
2016-01-01,3.9,
2015-12-31,3.5,3.4
";

    const CELLS_JSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"cell_id": 7, "mgmt_field_id": "N"},
             "geometry": {"type": "Point", "coordinates": [-89.4, 32.2]}},
            {"type": "Feature", "properties": {"cell_id": 8, "mgmt_field_id": "S", "landuse": "corn"},
             "geometry": {"type": "Point", "coordinates": [-89.3, 32.1]}}
        ]
    }"#;

    /// Helper to create a database with one fully loaded watershed and one empty.
    fn sample_db() -> Database {
        let reader = MemoryReader::new()
            .with("yac/et.csv", ET_CSV)
            .with("yac/runoff.csv", DISCHARGE_CSV)
            .with("yac/cells.geojson", CELLS_JSON);
        let config = DashboardConfig {
            watersheds: vec![
                WatershedConfig {
                    name: "Yackanookany".into(),
                    et: Some("yac/et.csv".into()),
                    discharge: Some("yac/runoff.csv".into()),
                    geometry: Some("yac/cells.geojson".into()),
                    geometry_crs: None,
                },
                WatershedConfig {
                    name: "Empty".into(),
                    et: None,
                    discharge: Some("empty/runoff.csv".into()),
                    geometry: None,
                    geometry_crs: None,
                },
            ],
            ..Default::default()
        };
        let db = Database::new().unwrap();
        db.load_watersheds_with(&config, &reader).unwrap();
        db
    }

    #[test]
    fn watershed_names_keep_config_order() {
        let db = sample_db();
        assert_eq!(db.watershed_names().unwrap(), vec!["Yackanookany", "Empty"]);
    }

    #[test]
    fn source_statuses_cover_every_pair() {
        let db = sample_db();
        let statuses = db.source_statuses().unwrap();
        assert_eq!(statuses.len(), 6);
        assert_eq!(statuses[0].kind, SourceKind::Et);
        assert_eq!(statuses[0].rows, 5);
        assert!(statuses[0].loaded);
        let failed = &statuses[4];
        assert_eq!(failed.watershed, "Empty");
        assert_eq!(failed.kind, SourceKind::Discharge);
        assert!(!failed.loaded);
        assert!(failed.message.is_some());
        assert_eq!(statuses[3].path, None);
    }

    #[test]
    fn has_source_reflects_load_outcome() {
        let db = sample_db();
        assert!(db.has_source("Yackanookany", SourceKind::Discharge).unwrap());
        assert!(!db.has_source("Empty", SourceKind::Discharge).unwrap());
        assert!(!db.has_source("Nowhere", SourceKind::Et).unwrap());
    }

    #[test]
    fn et_years_are_distinct_and_sorted() {
        let db = sample_db();
        assert_eq!(db.et_years("Yackanookany").unwrap(), vec![2015, 2016, 2017]);
        assert!(db.et_years("Empty").unwrap().is_empty());
    }

    #[test]
    fn et_year_is_filtered_and_date_sorted() {
        let db = sample_db();
        let rows = db.query_et_year("Yackanookany", 2016).unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2016-01-01", "2016-01-01", "2016-01-02"]);
        // Duplicate dates keep file order
        assert_eq!(rows[0].model_et, Some(1.5));
        assert_eq!(rows[1].model_et, Some(1.6));

        let rows = db.query_et_year("Yackanookany", 2015).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].noah_et, None);

        assert!(db.query_et_year("Yackanookany", 2020).unwrap().is_empty());
    }

    #[test]
    fn discharge_year_only_has_present_columns() {
        let db = sample_db();
        assert_eq!(
            db.discharge_columns("Yackanookany").unwrap(),
            vec![DischargeColumn::UsgsObserved, DischargeColumn::ModisEt]
        );
        let year = db.query_discharge_year("Yackanookany", 2016).unwrap();
        assert_eq!(year.rows.len(), 2);
        assert_eq!(year.rows[0].date, "2016-01-01");
        assert_eq!(year.rows[0].values, vec![None, Some(3.9)]);
        assert_eq!(year.rows[1].values, vec![Some(4.0), Some(4.1)]);

        let empty = db.query_discharge_year("Empty", 2016).unwrap();
        assert!(empty.columns.is_empty());
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn cells_round_trip_through_json() {
        let db = sample_db();
        assert_eq!(
            db.cell_columns("Yackanookany").unwrap(),
            vec!["cell_id", "mgmt_field_id", "landuse"]
        );
        let cells = db.query_cells("Yackanookany").unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].properties["landuse"], "corn");
        assert_eq!(cells[0].geometry.as_ref().unwrap()["type"], "Point");

        let extent = db.cell_bounds("Yackanookany").unwrap().unwrap();
        assert_eq!(extent.source_crs, "EPSG:4326");
        assert_eq!(extent.bounds.min_lon, -89.4);
        assert_eq!(extent.bounds.max_lat, 32.2);
        assert!(db.cell_bounds("Empty").unwrap().is_none());
    }
}
