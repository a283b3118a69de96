//! Daily discharge/runoff series.
//!
//! `Date` plus any subset of the four candidate columns (m³/s):
//!
//! ```text
//! Date,USGS_Runoff_cms,Runoff_No_ET_cms,Runoff_MODIS_ET_cms,Runoff_NOAH_ET_cms
//! 2015-01-01,12.4,15.1,13.0,12.8
//! ```

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;

use crate::columns::DischargeColumn;
use crate::et::{date_index, parse_value};

/// One daily discharge record. Columns absent from the file stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeRecord {
    pub date: NaiveDate,
    pub year: i32,
    /// Indexed by [`DischargeColumn::index`].
    pub values: [Option<f64>; 4],
}

impl DischargeRecord {
    pub fn value(&self, column: DischargeColumn) -> Option<f64> {
        self.values[column.index()]
    }
}

/// Parsed discharge file: which candidate columns it carried and its rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DischargeTable {
    /// Present columns, in candidate order.
    pub columns: Vec<DischargeColumn>,
    pub records: Vec<DischargeRecord>,
}

/// Parse a discharge CSV. Unknown columns are ignored.
pub fn parse_discharge_csv(data: &[u8]) -> anyhow::Result<DischargeTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read discharge header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let date_idx = date_index(&headers)?;

    let mut column_idx: [Option<usize>; 4] = [None; 4];
    for (i, header) in headers.iter().enumerate() {
        if let Some(column) = DischargeColumn::from_header(header) {
            column_idx[column.index()] = Some(i);
        }
    }
    let columns: Vec<DischargeColumn> = DischargeColumn::ALL
        .into_iter()
        .filter(|c| column_idx[c.index()].is_some())
        .collect();

    let mut records = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let r = result.with_context(|| format!("malformed discharge row {}", line + 2))?;
        let raw_date = r.get(date_idx).unwrap_or("");
        let date = wsd_utils::dates::parse_date_flexible(raw_date)
            .with_context(|| format!("discharge row {}", line + 2))?;
        let values = column_idx.map(|idx| idx.and_then(|i| parse_value(r.get(i))));
        records.push(DischargeRecord {
            date,
            year: date.year(),
            values,
        });
    }
    log::debug!(
        "parsed {} discharge records with columns {:?}",
        records.len(),
        columns
    );
    Ok(DischargeTable { columns, records })
}
