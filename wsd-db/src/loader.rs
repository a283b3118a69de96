//! Populating the registry from a [`DashboardConfig`].
//!
//! Each watershed's three sources are loaded independently. A source that
//! cannot be read or parsed is logged as a warning and recorded in the
//! `sources` table with `loaded = 0`; it never stops the other sources or the
//! other watersheds from loading.

use anyhow::Context;
use rusqlite::params;
use std::path::Path;

use wsd_core::discharge::{parse_discharge_csv, DischargeTable};
use wsd_core::et::{parse_et_csv, EtTable};
use wsd_core::geometry::{parse_cells, CellLayer};
use wsd_core::source::{read_source, FsReader, SourceReader};
use wsd_core::{DashboardConfig, SourceKind, WatershedConfig};
use wsd_utils::dates::format_date;

use crate::Database;

/// What happened during [`Database::load_watersheds`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Watersheds registered, in configuration order.
    pub registered: Vec<String>,
    /// One message per source that failed to load, or per skipped duplicate.
    pub warnings: Vec<String>,
}

impl Database {
    /// Load every configured watershed from the local filesystem.
    pub fn load_watersheds(&self, config: &DashboardConfig) -> anyhow::Result<LoadReport> {
        self.load_watersheds_with(config, &FsReader)
    }

    /// Load every configured watershed through `reader`.
    ///
    /// Only SQLite failures abort; source failures end up in the report.
    pub fn load_watersheds_with(
        &self,
        config: &DashboardConfig,
        reader: &dyn SourceReader,
    ) -> anyhow::Result<LoadReport> {
        let mut report = LoadReport::default();
        for ws in &config.watersheds {
            if report.registered.iter().any(|n| n == &ws.name) {
                let msg = format!("duplicate watershed '{}' skipped", ws.name);
                log::warn!("{}", msg);
                report.warnings.push(msg);
                continue;
            }
            self.register_watershed(&ws.name, report.registered.len())?;
            for kind in SourceKind::ALL {
                if let Some(msg) = self.load_source(ws, kind, reader)? {
                    report.warnings.push(msg);
                }
            }
            report.registered.push(ws.name.clone());
        }
        log::info!(
            "loader: registered {} watersheds with {} warnings",
            report.registered.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn register_watershed(&self, name: &str, position: usize) -> anyhow::Result<()> {
        self.conn.borrow().execute(
            "INSERT INTO watersheds (name, position) VALUES (?1, ?2)",
            params![name, position as i64],
        )?;
        Ok(())
    }

    /// Load one sub-table. Returns the warning message when the source failed.
    fn load_source(
        &self,
        ws: &WatershedConfig,
        kind: SourceKind,
        reader: &dyn SourceReader,
    ) -> anyhow::Result<Option<String>> {
        let Some(path) = ws.path(kind) else {
            log::info!("loader: '{}' has no {} source configured", ws.name, kind);
            self.record_source(&ws.name, kind, None, None)?;
            return Ok(None);
        };
        let path_str = path.display().to_string();

        match self.read_and_store(ws, kind, path, reader) {
            Ok(rows) => {
                log::info!(
                    "loader: loaded {} {} rows for '{}' from {}",
                    rows,
                    kind,
                    ws.name,
                    path_str
                );
                self.record_source(&ws.name, kind, Some(&path_str), Some(Ok(rows)))?;
                Ok(None)
            }
            Err(e) => {
                let msg = format!(
                    "failed to load {} for '{}' from {}: {:#}",
                    kind, ws.name, path_str, e
                );
                log::warn!("{}", msg);
                self.record_source(
                    &ws.name,
                    kind,
                    Some(&path_str),
                    Some(Err(format!("{:#}", e))),
                )?;
                Ok(Some(msg))
            }
        }
    }

    /// Parse fully, then insert in one transaction so a failure leaves nothing behind.
    fn read_and_store(
        &self,
        ws: &WatershedConfig,
        kind: SourceKind,
        path: &Path,
        reader: &dyn SourceReader,
    ) -> anyhow::Result<usize> {
        let bytes = read_source(reader, path)?;
        match kind {
            SourceKind::Et => {
                let table = parse_et_csv(&bytes)?;
                self.insert_et(&ws.name, &table)
            }
            SourceKind::Discharge => {
                let table = parse_discharge_csv(&bytes)?;
                self.insert_discharge(&ws.name, &table)
            }
            SourceKind::Geometry => {
                let layer = parse_cells(&bytes, ws.geometry_crs.as_deref())?;
                self.insert_cells(&ws.name, &layer)
            }
        }
    }

    fn record_source(
        &self,
        watershed: &str,
        kind: SourceKind,
        path: Option<&str>,
        outcome: Option<Result<usize, String>>,
    ) -> anyhow::Result<()> {
        let (loaded, rows, message) = match outcome {
            Some(Ok(rows)) => (true, rows as i64, None),
            Some(Err(msg)) => (false, 0, Some(msg)),
            None => (false, 0, None),
        };
        self.conn.borrow().execute(
            "INSERT OR REPLACE INTO sources (watershed, kind, path, loaded, rows, message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![watershed, kind.as_str(), path, loaded, rows, message],
        )?;
        Ok(())
    }

    fn insert_et(&self, watershed: &str, table: &EtTable) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut cols = tx.prepare(
                "INSERT INTO et_columns (watershed, position, column_name)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (position, name) in table.columns.iter().enumerate() {
                cols.execute(params![watershed, position as i64, name])?;
            }
            let mut stmt = tx.prepare(
                "INSERT INTO et_series
                 (watershed, seq, date, year, model_et, modis_et, noah_et, extra)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (seq, r) in table.records.iter().enumerate() {
                stmt.execute(params![
                    watershed,
                    seq as i64,
                    format_date(&r.date),
                    r.year,
                    r.values[0],
                    r.values[1],
                    r.values[2],
                    serde_json::to_string(&r.extra)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(table.records.len())
    }

    fn insert_discharge(&self, watershed: &str, table: &DischargeTable) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut cols = tx.prepare(
                "INSERT INTO discharge_columns (watershed, position, column_name)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (position, column) in table.columns.iter().enumerate() {
                cols.execute(params![watershed, position as i64, column.header()])?;
            }
            let mut stmt = tx.prepare(
                "INSERT INTO discharge_series
                 (watershed, seq, date, year, usgs_runoff_cms, runoff_no_et_cms,
                  runoff_modis_et_cms, runoff_noah_et_cms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (seq, r) in table.records.iter().enumerate() {
                stmt.execute(params![
                    watershed,
                    seq as i64,
                    format_date(&r.date),
                    r.year,
                    r.values[0],
                    r.values[1],
                    r.values[2],
                    r.values[3],
                ])?;
            }
        }
        tx.commit()?;
        Ok(table.records.len())
    }

    fn insert_cells(&self, watershed: &str, layer: &CellLayer) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut cols = tx.prepare(
                "INSERT INTO cell_columns (watershed, position, column_name) VALUES (?1, ?2, ?3)",
            )?;
            for (position, name) in layer.columns.iter().enumerate() {
                cols.execute(params![watershed, position as i64, name])?;
            }
            let mut stmt = tx.prepare(
                "INSERT INTO cells (watershed, seq, properties, geometry) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (seq, cell) in layer.cells.iter().enumerate() {
                let properties = serde_json::to_string(&cell.properties)
                    .context("failed to encode cell properties")?;
                let geometry = cell
                    .geometry
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()
                    .context("failed to encode cell geometry")?;
                stmt.execute(params![watershed, seq as i64, properties, geometry])?;
            }
            if let Some(b) = layer.bounds {
                tx.execute(
                    "INSERT INTO cell_bounds (watershed, min_lon, min_lat, max_lon, max_lat, source_crs)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        watershed,
                        b.min_lon,
                        b.min_lat,
                        b.max_lon,
                        b.max_lat,
                        layer.source_crs.to_string()
                    ],
                )?;
            }
        }
        tx.commit()?;
        Ok(layer.cells.len())
    }
}
