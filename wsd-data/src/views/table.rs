//! Preview table of the selected year's ET rows.

use serde::Serialize;
use wsd_core::et::{et_layout, EtField};
use wsd_core::SourceKind;
use wsd_db::models::EtRow;
use wsd_db::Database;

use super::{selected, OrUnavailable, Placeholder, PlaceholderKind, View};
use crate::selection::SelectionState;

/// First rows of the filtered ET table, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    /// Cells as text; missing values are empty strings.
    pub rows: Vec<Vec<String>>,
    /// Rows in the full filtered year, before truncation.
    pub total_rows: usize,
}

/// Text form of a value, shared with the CSV exports.
pub fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// One ET row as text, following the stored header layout.
pub(crate) fn et_cells(layout: &[EtField], row: &EtRow) -> Vec<String> {
    layout
        .iter()
        .map(|field| match field {
            EtField::Date => row.date.clone(),
            EtField::Value(column) => format_value(row.value(*column)),
            EtField::Extra(i) => row.extra.get(*i).cloned().unwrap_or_default(),
        })
        .collect()
}

/// At most `preview_rows` ET rows of the selected year.
pub fn et_table(db: &Database, sel: &SelectionState, preview_rows: usize) -> View<TablePreview> {
    build_et_table(db, sel, preview_rows).into()
}

fn build_et_table(
    db: &Database,
    sel: &SelectionState,
    preview_rows: usize,
) -> Result<TablePreview, Placeholder> {
    let no_data = || Placeholder::new(PlaceholderKind::NoData, "No data available");
    let (watershed, year) = selected(sel).ok_or_else(no_data)?;
    if !db.has_source(watershed, SourceKind::Et).or_unavailable("ET data")? {
        return Err(no_data());
    }
    let rows = db.query_et_year(watershed, year).or_unavailable("ET data")?;
    if rows.is_empty() {
        return Err(Placeholder::new(
            PlaceholderKind::NoData,
            format!("No data available for {} in year {}", watershed, year),
        ));
    }
    let columns = db.et_columns(watershed).or_unavailable("ET data")?;
    let layout = et_layout(&columns);
    Ok(TablePreview {
        rows: rows
            .iter()
            .take(preview_rows)
            .map(|r| et_cells(&layout, r))
            .collect(),
        columns,
        total_rows: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_db, state};

    #[test]
    fn preview_is_truncated_and_formatted() {
        let db = sample_db();
        let view = et_table(&db, &state("Yackanookany", 2016), 2);
        let table = view.ready().unwrap();
        assert_eq!(
            table.columns,
            vec!["Date", "Model_calculated_ET", "MODIS_ET", "Noah_LSM_ET"]
        );
        assert_eq!(table.total_rows, 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["2016-01-15", "1", "1.2", "1.4"]);
        // Non-numeric MODIS cell is shown as missing
        assert_eq!(table.rows[1], vec!["2016-02-01", "2", "", "2.2"]);
    }

    #[test]
    fn preview_length_follows_argument() {
        let db = sample_db();
        let table = et_table(&db, &state("Yackanookany", 2016), 20);
        assert_eq!(table.ready().unwrap().rows.len(), 3);
    }

    #[test]
    fn empty_year_is_a_placeholder() {
        let db = sample_db();
        let view = et_table(&db, &state("Yackanookany", 1999), 20);
        assert_eq!(
            view.placeholder().unwrap().message,
            "No data available for Yackanookany in year 1999"
        );
    }
}
