//! Download payloads for the selected watershed and year.
//!
//! Exports always cover the full filtered year, never just the preview rows.

use anyhow::Context;
use serde::Serialize;
use std::io::{Cursor, Write};
use wsd_core::et::et_layout;
use wsd_core::{SourceKind, DATE_COLUMN};
use wsd_db::Database;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::selection::SelectionState;
use crate::views::table::{et_cells, format_value};
use crate::views::{selected, OrUnavailable, Placeholder, PlaceholderKind, View};

pub const CSV_MIME: &str = "text/csv";
pub const ZIP_MIME: &str = "application/zip";

/// A file ready to be saved or offered for download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

pub fn et_filename(watershed: &str, year: i32) -> String {
    format!("ET_data_{}_{}.csv", watershed, year)
}

pub fn discharge_filename(watershed: &str, year: i32) -> String {
    format!("Discharge_data_{}_{}.csv", watershed, year)
}

pub fn combined_filename(watershed: &str, year: i32) -> String {
    format!("All_data_{}_{}.zip", watershed, year)
}

fn select_first() -> Placeholder {
    Placeholder::new(
        PlaceholderKind::SelectionIncomplete,
        "Select watershed and year",
    )
}

fn write_csv(header: &[String], rows: impl Iterator<Item = Vec<String>>) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.into_inner().context("failed to flush CSV")
}

/// ET CSV body, `None` when the year has no rows.
fn et_csv(db: &Database, watershed: &str, year: i32) -> Result<Option<Vec<u8>>, Placeholder> {
    if !db.has_source(watershed, SourceKind::Et).or_unavailable("ET data")? {
        return Ok(None);
    }
    let rows = db.query_et_year(watershed, year).or_unavailable("ET data")?;
    if rows.is_empty() {
        return Ok(None);
    }
    let columns = db.et_columns(watershed).or_unavailable("ET data")?;
    let layout = et_layout(&columns);
    write_csv(&columns, rows.iter().map(|r| et_cells(&layout, r)))
        .or_unavailable("ET export")
        .map(Some)
}

/// Discharge CSV body restricted to `Date` and the present columns.
fn discharge_csv(
    db: &Database,
    watershed: &str,
    year: i32,
) -> Result<Option<Vec<u8>>, Placeholder> {
    if !db
        .has_source(watershed, SourceKind::Discharge)
        .or_unavailable("discharge data")?
    {
        return Ok(None);
    }
    let data = db
        .query_discharge_year(watershed, year)
        .or_unavailable("discharge data")?;
    if data.rows.is_empty() {
        return Ok(None);
    }
    let header: Vec<String> = std::iter::once(DATE_COLUMN.to_string())
        .chain(data.columns.iter().map(|c| c.header().to_string()))
        .collect();
    let rows = data.rows.iter().map(|r| {
        std::iter::once(r.date.clone())
            .chain(r.values.iter().map(|v| format_value(*v)))
            .collect::<Vec<String>>()
    });
    write_csv(&header, rows)
        .or_unavailable("discharge export")
        .map(Some)
}

/// `ET_data_<watershed>_<year>.csv`
pub fn et_export(db: &Database, sel: &SelectionState) -> View<Download> {
    let build = || -> Result<Download, Placeholder> {
        let (watershed, year) = selected(sel).ok_or_else(select_first)?;
        let bytes = et_csv(db, watershed, year)?
            .ok_or_else(|| Placeholder::new(PlaceholderKind::NoData, "No ET data available"))?;
        Ok(Download {
            filename: et_filename(watershed, year),
            mime: CSV_MIME,
            bytes,
        })
    };
    build().into()
}

/// `Discharge_data_<watershed>_<year>.csv`
pub fn discharge_export(db: &Database, sel: &SelectionState) -> View<Download> {
    let build = || -> Result<Download, Placeholder> {
        let (watershed, year) = selected(sel).ok_or_else(select_first)?;
        let bytes = discharge_csv(db, watershed, year)?.ok_or_else(|| {
            Placeholder::new(PlaceholderKind::NoData, "No discharge data available")
        })?;
        Ok(Download {
            filename: discharge_filename(watershed, year),
            mime: CSV_MIME,
            bytes,
        })
    };
    build().into()
}

/// Store `entries` in a deflated archive with fixed timestamps.
pub fn zip_entries(entries: &[(String, Vec<u8>)]) -> anyhow::Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());
    for (name, bytes) in entries {
        writer
            .start_file(name.as_str(), options)
            .with_context(|| format!("failed to add {} to archive", name))?;
        writer.write_all(bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// `All_data_<watershed>_<year>.zip` holding whichever CSVs are non-empty.
pub fn combined_export(db: &Database, sel: &SelectionState) -> View<Download> {
    let build = || -> Result<Download, Placeholder> {
        let (watershed, year) = selected(sel).ok_or_else(select_first)?;
        let mut entries = Vec::new();
        if let Some(bytes) = et_csv(db, watershed, year)? {
            entries.push((et_filename(watershed, year), bytes));
        }
        if let Some(bytes) = discharge_csv(db, watershed, year)? {
            entries.push((discharge_filename(watershed, year), bytes));
        }
        if entries.is_empty() {
            return Err(Placeholder::new(PlaceholderKind::NoData, "No data available"));
        }
        let bytes = zip_entries(&entries).or_unavailable("combined export")?;
        log::debug!(
            "export: archive for {} {} with {} entries",
            watershed,
            year,
            entries.len()
        );
        Ok(Download {
            filename: combined_filename(watershed, year),
            mime: ZIP_MIME,
            bytes,
        })
    };
    build().into()
}

/// Which of the three downloads to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Et,
    Discharge,
    All,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Et, ExportKind::Discharge, ExportKind::All];

    pub fn build(self, db: &Database, sel: &SelectionState) -> View<Download> {
        match self {
            ExportKind::Et => et_export(db, sel),
            ExportKind::Discharge => discharge_export(db, sel),
            ExportKind::All => combined_export(db, sel),
        }
    }

    /// Button text in the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            ExportKind::Et => "Download ET Data",
            ExportKind::Discharge => "Download Discharge Data",
            ExportKind::All => "Download All Data (ZIP)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_db, state};
    use std::io::Read;

    #[test]
    fn et_export_covers_full_year() {
        let db = sample_db();
        let view = et_export(&db, &state("Yackanookany", 2016));
        let download = view.ready().unwrap();
        assert_eq!(download.filename, "ET_data_Yackanookany_2016.csv");
        assert_eq!(download.mime, "text/csv");
        assert_eq!(
            String::from_utf8(download.bytes.clone()).unwrap(),
            "Date,Model_calculated_ET,MODIS_ET,Noah_LSM_ET\n\
             2016-01-15,1,1.2,1.4\n\
             2016-02-01,2,,2.2\n\
             2016-02-20,3,2.1,\n"
        );
    }

    #[test]
    fn discharge_export_keeps_present_columns() {
        let db = sample_db();
        let view = discharge_export(&db, &state("Pearl River at Burnside", 2016));
        let download = view.ready().unwrap();
        assert_eq!(download.filename, "Discharge_data_Pearl River at Burnside_2016.csv");
        let text = String::from_utf8(download.bytes.clone()).unwrap();
        assert!(text.starts_with("Date,USGS_Runoff_cms\n"), "{}", text);
    }

    #[test]
    fn exports_without_selection_ask_for_one() {
        let db = sample_db();
        let sel = SelectionState::default();
        for view in [
            et_export(&db, &sel),
            discharge_export(&db, &sel),
            combined_export(&db, &sel),
        ] {
            let p = view.placeholder().unwrap().clone();
            assert_eq!(p.kind, PlaceholderKind::SelectionIncomplete);
            assert_eq!(p.message, "Select watershed and year");
        }
    }

    #[test]
    fn combined_export_bundles_non_empty_tables() {
        let db = sample_db();
        // Pearl River has discharge but no ET
        let view = combined_export(&db, &state("Pearl River at Burnside", 2016));
        let download = view.ready().unwrap();
        assert_eq!(download.filename, "All_data_Pearl River at Burnside_2016.zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(download.bytes.clone())).unwrap();
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), "Discharge_data_Pearl River at Burnside_2016.csv");
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        assert!(text.starts_with("Date,USGS_Runoff_cms\n"));
    }

    #[test]
    fn export_kind_dispatches_to_matching_builder() {
        let db = sample_db();
        let sel = state("Yackanookany", 2016);
        let names: Vec<String> = ExportKind::ALL
            .iter()
            .map(|k| k.build(&db, &sel).ready().unwrap().filename.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "ET_data_Yackanookany_2016.csv",
                "Discharge_data_Yackanookany_2016.csv",
                "All_data_Yackanookany_2016.zip",
            ]
        );
    }

    #[test]
    fn combined_export_is_byte_identical_across_calls() {
        let db = sample_db();
        let sel = state("Yackanookany", 2016);
        let a = combined_export(&db, &sel);
        let b = combined_export(&db, &sel);
        assert_eq!(a.ready().unwrap().bytes, b.ready().unwrap().bytes);

        let archive = zip::ZipArchive::new(Cursor::new(a.ready().unwrap().bytes.clone())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"ET_data_Yackanookany_2016.csv"));
        assert!(names.contains(&"Discharge_data_Yackanookany_2016.csv"));
    }
}
