//! End-to-end behaviour through the public API: load, select, derive, export.

use std::io::{Cursor, Read};

use wsd_core::{DashboardConfig, MemoryReader, WatershedConfig};
use wsd_data::views::{discharge_chart, et_chart, et_table, watershed_map};
use wsd_data::{
    combined_export, discharge_export, et_export, PlaceholderKind, SelectionCatalog,
    SelectionEvent, SelectionState,
};
use wsd_db::Database;

fn et_csv(years: std::ops::RangeInclusive<i32>) -> String {
    let mut csv = String::from("Date,Model_aclculated_ET,MODIS_ET,Noah_LSM_ET\n");
    for year in years {
        for month in [1, 4, 7, 10] {
            csv.push_str(&format!(
                "{}-{:02}-15,{}.5,{}.25,{}.75\n",
                year, month, month, month, month
            ));
        }
    }
    csv
}

fn config(watersheds: Vec<WatershedConfig>) -> DashboardConfig {
    DashboardConfig {
        watersheds,
        ..Default::default()
    }
}

fn ws(name: &str, et: Option<&str>, discharge: Option<&str>, geometry: Option<&str>) -> WatershedConfig {
    WatershedConfig {
        name: name.to_string(),
        et: et.map(Into::into),
        discharge: discharge.map(Into::into),
        geometry: geometry.map(Into::into),
        geometry_crs: None,
    }
}

fn load(config: &DashboardConfig, reader: &MemoryReader) -> (Database, SelectionCatalog) {
    let db = Database::new().unwrap();
    db.load_watersheds_with(config, reader).unwrap();
    let catalog = SelectionCatalog::from_database(&db, &config.preferred_color_field).unwrap();
    (db, catalog)
}

#[test]
fn scenario_1_year_without_rows_yields_no_data_everywhere() {
    let reader = MemoryReader::new()
        .with("yac/et.csv", et_csv(2015..=2018))
        .with(
            "yac/runoff.csv",
            "Date,USGS_Runoff_cms\n2015-01-01,3.0\n2018-12-31,4.0\n",
        );
    let cfg = config(vec![ws("Yackanookany", Some("yac/et.csv"), Some("yac/runoff.csv"), None)]);
    let (db, catalog) = load(&cfg, &reader);

    let initial = SelectionState::initial(&catalog);
    assert_eq!(initial.year_options, vec![2015, 2016, 2017, 2018]);

    // 2020 is not offered, so the reducer keeps the current year
    assert_eq!(
        initial.apply(&catalog, SelectionEvent::YearChanged(2020)),
        initial
    );

    let sel = SelectionState {
        year: Some(2020),
        ..initial
    };
    assert_eq!(
        et_chart(&db, &sel).placeholder().unwrap().message,
        "No data available for Yackanookany in year 2020"
    );
    assert_eq!(
        et_table(&db, &sel, 20).placeholder().unwrap().kind,
        PlaceholderKind::NoData
    );
    assert_eq!(
        et_export(&db, &sel).placeholder().unwrap().kind,
        PlaceholderKind::NoData
    );
    assert_eq!(
        discharge_export(&db, &sel).placeholder().unwrap().kind,
        PlaceholderKind::NoData
    );
    let combined = combined_export(&db, &sel);
    let p = combined.placeholder().expect("no archive for an empty year");
    assert_eq!(p.kind, PlaceholderKind::NoData);
    assert_eq!(p.message, "No data available");
}

#[test]
fn scenario_2_gauge_only_discharge() {
    let reader = MemoryReader::new()
        .with("pearl/et.csv", et_csv(2016..=2016))
        .with(
            "pearl/runoff.csv",
            "Date,USGS_Runoff_cms\n2016-04-02,55.0\n2016-04-01,50.5\n2017-01-01,12.0\n",
        );
    let cfg = config(vec![ws(
        "Pearl River at Burnside",
        Some("pearl/et.csv"),
        Some("pearl/runoff.csv"),
        None,
    )]);
    let (db, catalog) = load(&cfg, &reader);
    let sel = SelectionState::initial(&catalog);
    assert_eq!(sel.year, Some(2016));

    let chart = discharge_chart(&db, &sel);
    let chart = chart.ready().unwrap();
    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].name, "USGS_Runoff_cms");
    assert_eq!(chart.series[0].points.len(), 2);

    let export = discharge_export(&db, &sel);
    let text = String::from_utf8(export.ready().unwrap().bytes.clone()).unwrap();
    assert_eq!(text, "Date,USGS_Runoff_cms\n2016-04-01,50.5\n2016-04-02,55\n");
}

#[test]
fn scenario_3_twenty_five_categories() {
    let mut features = Vec::new();
    for i in 0..50 {
        let x = -89.0 + (i as f64) * 0.01;
        features.push(format!(
            r#"{{"type":"Feature","properties":{{"cell_id":{},"mgmt_field_id":"MF{:02}"}},
               "geometry":{{"type":"Polygon","coordinates":[[[{x},32.0],[{x2},32.0],[{x2},32.01],[{x},32.0]]]}}}}"#,
            i,
            i % 25,
            x = x,
            x2 = x + 0.01
        ));
    }
    let geojson = format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    );
    let reader = MemoryReader::new().with("yac/cells.geojson", geojson);
    let cfg = config(vec![ws("Yackanookany", None, None, Some("yac/cells.geojson"))]);
    let (db, catalog) = load(&cfg, &reader);
    let sel = SelectionState::initial(&catalog);
    assert_eq!(sel.color_field.as_deref(), Some("mgmt_field_id"));

    let first = watershed_map(&db, &sel);
    let second = watershed_map(&db, &sel);
    let map = first.ready().unwrap();
    assert_eq!(map.legend.len(), 25);
    assert_eq!(map.legend[0].label, "MF00");
    assert_eq!(map.legend[24].label, "MF24");
    assert_eq!(first, second);
    // Cells sharing a value share a colour
    assert_eq!(map.features[0].fill_color, map.features[25].fill_color);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn scenario_4_missing_discharge_file() {
    let reader = MemoryReader::new()
        .with("yac/et.csv", et_csv(2015..=2016))
        .with("pearl/et.csv", et_csv(2003..=2004))
        .with("pearl/runoff.csv", "Date,USGS_Runoff_cms\n2003-01-01,1.0\n");
    let cfg = config(vec![
        ws("Yackanookany", Some("yac/et.csv"), Some("yac/missing.csv"), None),
        ws("Pearl River at Burnside", Some("pearl/et.csv"), Some("pearl/runoff.csv"), None),
    ]);
    let db = Database::new().unwrap();
    let report = db.load_watersheds_with(&cfg, &reader).unwrap();
    assert_eq!(report.registered.len(), 2);
    assert_eq!(report.warnings.len(), 1, "{:?}", report.warnings);
    assert!(report.warnings[0].contains("yac/missing.csv"));

    let catalog = SelectionCatalog::from_database(&db, "mgmt_field_id").unwrap();
    let sel = SelectionState::initial(&catalog)
        .apply(&catalog, SelectionEvent::WatershedChanged("Pearl River at Burnside".into()))
        .apply(&catalog, SelectionEvent::WatershedChanged("Yackanookany".into()));
    assert_eq!(sel.year, Some(2015));

    assert_eq!(
        discharge_chart(&db, &sel).placeholder().unwrap().message,
        "No discharge data available"
    );
    assert!(et_chart(&db, &sel).is_ready());

    // Combined export still carries the ET file
    let combined = combined_export(&db, &sel);
    let mut archive = zip::ZipArchive::new(Cursor::new(combined.ready().unwrap().bytes.clone())).unwrap();
    assert_eq!(archive.len(), 1);
    let mut text = String::new();
    archive
        .by_name("ET_data_Yackanookany_2015.csv")
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn exported_csv_round_trips_through_a_reader() {
    let reader = MemoryReader::new().with("yac/et.csv", et_csv(2017..=2017));
    let cfg = config(vec![ws("Yackanookany", Some("yac/et.csv"), None, None)]);
    let (db, catalog) = load(&cfg, &reader);
    let sel = SelectionState::initial(&catalog);

    let rows = db.query_et_year("Yackanookany", 2017).unwrap();
    let export = et_export(&db, &sel);
    let bytes = export.ready().unwrap().bytes.clone();
    let mut rdr = csv::Reader::from_reader(bytes.as_slice());
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["Date", "Model_calculated_ET", "MODIS_ET", "Noah_LSM_ET"]);

    let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), rows.len());
    for (record, row) in records.iter().zip(&rows) {
        assert_eq!(&record[0], row.date);
        assert_eq!(record[1].parse::<f64>().ok(), row.model_et);
        assert_eq!(record[2].parse::<f64>().ok(), row.modis_et);
        assert_eq!(record[3].parse::<f64>().ok(), row.noah_et);
    }
}

#[test]
fn extra_et_columns_survive_table_and_export() {
    let reader = MemoryReader::new().with(
        "yac/et.csv",
        "Date,Model_calculated_ET,MODIS_ET,Noah_LSM_ET,Precip_mm\n\
         2016-01-02,4,5,6,\n\
         2016-01-01,1,2,3,44\n",
    );
    let cfg = config(vec![ws("Yackanookany", Some("yac/et.csv"), None, None)]);
    let (db, catalog) = load(&cfg, &reader);
    let sel = SelectionState::initial(&catalog);

    let table = et_table(&db, &sel, 20);
    let table = table.ready().unwrap();
    assert_eq!(table.columns.last().map(String::as_str), Some("Precip_mm"));
    assert_eq!(table.rows[0], vec!["2016-01-01", "1", "2", "3", "44"]);

    let export = et_export(&db, &sel);
    assert_eq!(
        String::from_utf8(export.ready().unwrap().bytes.clone()).unwrap(),
        "Date,Model_calculated_ET,MODIS_ET,Noah_LSM_ET,Precip_mm\n\
         2016-01-01,1,2,3,44\n\
         2016-01-02,4,5,6,\n"
    );
}

#[test]
fn et_file_without_noah_column_still_drives_every_view() {
    let reader = MemoryReader::new().with(
        "yac/et.csv",
        "Date,Model_calculated_ET,MODIS_ET\n2016-03-01,1,2\n2016-03-02,1.5,2.5\n",
    );
    let cfg = config(vec![ws("Yackanookany", Some("yac/et.csv"), None, None)]);
    let (db, catalog) = load(&cfg, &reader);
    let sel = SelectionState::initial(&catalog);
    assert_eq!(sel.year, Some(2016));

    let chart = et_chart(&db, &sel);
    let names: Vec<&str> = chart
        .ready()
        .unwrap()
        .series
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["Model_calculated_ET", "MODIS_ET"]);

    let export = et_export(&db, &sel);
    assert_eq!(
        String::from_utf8(export.ready().unwrap().bytes.clone()).unwrap(),
        "Date,Model_calculated_ET,MODIS_ET\n2016-03-01,1,2\n2016-03-02,1.5,2.5\n"
    );
    assert!(combined_export(&db, &sel).ready().is_some());
}
