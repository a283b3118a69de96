//! Daily evapotranspiration series.
//!
//! Expected format (with headers):
//!
//! ```text
//! Date,Model_calculated_ET,MODIS_ET,Noah_LSM_ET
//! 2015-01-01,0.82,0.64,0.71
//! ```
//!
//! Any of the three ET columns may be absent; its values are then missing.
//! Other columns are kept as text so the table and export carry them through.

use anyhow::{anyhow, Context};
use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;

use crate::columns::{EtColumn, DATE_COLUMN};

/// Derived column some files already carry; dropped on load and never exported.
pub const YEAR_COLUMN: &str = "year";

/// Where the values of one ET header live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtField {
    Date,
    Value(EtColumn),
    /// Index into [`EtRecord::extra`].
    Extra(usize),
}

/// Map stored headers to fields. Repeated headers after the first become extras.
pub fn et_layout(columns: &[String]) -> Vec<EtField> {
    let mut layout = Vec::with_capacity(columns.len());
    let mut extras = 0;
    for name in columns {
        let known = if name == DATE_COLUMN {
            Some(EtField::Date)
        } else {
            EtColumn::from_header(name).map(EtField::Value)
        };
        let field = match known {
            Some(f) if !layout.contains(&f) => f,
            _ => {
                extras += 1;
                EtField::Extra(extras - 1)
            }
        };
        layout.push(field);
    }
    layout
}

/// ET columns present in `columns`, in plotting order.
pub fn present_et_columns(columns: &[String]) -> Vec<EtColumn> {
    let layout = et_layout(columns);
    EtColumn::ALL
        .into_iter()
        .filter(|c| layout.contains(&EtField::Value(*c)))
        .collect()
}

/// One daily ET record. `year` is derived once from `date` at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct EtRecord {
    pub date: NaiveDate,
    pub year: i32,
    /// Indexed by [`EtColumn::index`]; `None` for empty, non-numeric or absent cells.
    pub values: [Option<f64>; 3],
    /// Raw text of the non-ET columns, in [`EtField::Extra`] order.
    pub extra: Vec<String>,
}

impl EtRecord {
    pub fn value(&self, column: EtColumn) -> Option<f64> {
        self.values[column.index()]
    }
}

/// Parsed ET file: its headers (canonical names, `year` dropped) and rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EtTable {
    pub columns: Vec<String>,
    pub records: Vec<EtRecord>,
}

/// Parse a numeric cell, treating empty/non-numeric text as missing.
pub(crate) fn parse_value(field: Option<&str>) -> Option<f64> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Locate the `Date` column in a header row.
pub(crate) fn date_index(headers: &[String]) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or_else(|| anyhow!("missing '{}' column", DATE_COLUMN))
}

/// Parse an ET CSV. Rows keep file order; sorting happens at query time.
pub fn parse_et_csv(data: &[u8]) -> anyhow::Result<EtTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read ET header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let date_idx = date_index(&headers)?;

    // (file index, stored name) for every kept header
    let kept: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.as_str() != YEAR_COLUMN)
        .map(|(i, h)| {
            let name = EtColumn::from_header(h).map_or(h.as_str(), |c| c.header());
            (i, name.to_string())
        })
        .collect();
    let columns: Vec<String> = kept.iter().map(|(_, name)| name.clone()).collect();
    let layout = et_layout(&columns);

    let mut value_idx = [None; 3];
    let mut extra_idx = Vec::new();
    for ((i, _), field) in kept.iter().zip(&layout) {
        match field {
            EtField::Value(column) => value_idx[column.index()] = Some(*i),
            EtField::Extra(_) => extra_idx.push(*i),
            EtField::Date => {}
        }
    }
    for column in EtColumn::ALL {
        if value_idx[column.index()].is_none() {
            log::info!("ET file has no '{}' column; its values are missing", column);
        }
    }

    let mut records = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let r = result.with_context(|| format!("malformed ET row {}", line + 2))?;
        let raw_date = r.get(date_idx).unwrap_or("");
        let date = wsd_utils::dates::parse_date_flexible(raw_date)
            .with_context(|| format!("ET row {}", line + 2))?;
        let values = value_idx.map(|idx| idx.and_then(|i| parse_value(r.get(i))));
        let extra = extra_idx
            .iter()
            .map(|&i| r.get(i).unwrap_or("").to_string())
            .collect();
        records.push(EtRecord {
            date,
            year: date.year(),
            values,
            extra,
        });
    }
    log::debug!("parsed {} ET records", records.len());
    Ok(EtTable { columns, records })
}
