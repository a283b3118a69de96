//! ET and discharge line charts for the selected watershed and year.

use serde::Serialize;
use wsd_core::et::present_et_columns;
use wsd_core::{EtColumn, SourceKind};
use wsd_db::models::EtRow;
use wsd_db::Database;
use wsd_utils::dates::{first_of_month, format_date, month_abbrev, parse_date};

use super::{axis, selected, OrUnavailable, Placeholder, PlaceholderKind, View};
use crate::selection::SelectionState;

pub const X_LABEL: &str = "Month";
pub const ET_Y_LABEL: &str = "ET (mm/day)";
pub const DISCHARGE_Y_LABEL: &str = "Discharge (m³/s)";

/// One daily value. `None` leaves a gap in the line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<LinePoint>,
}

/// X-axis tick at the first day of a month, labelled `Jan`, `Feb`, ...
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTick {
    pub date: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
    /// `[min, max]` for the y-axis, padded and floored at zero.
    pub y_range: [f64; 2],
    pub month_ticks: Vec<MonthTick>,
}

/// One tick per month touched by the (sorted) dates.
pub fn month_ticks<'a, I>(dates: I) -> Vec<MonthTick>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ticks: Vec<MonthTick> = Vec::new();
    for date in dates {
        let Ok(date) = parse_date(date) else {
            continue;
        };
        let month = format_date(&first_of_month(&date));
        if ticks.last().map(|t| t.date == month).unwrap_or(false) {
            continue;
        }
        ticks.push(MonthTick {
            date: month,
            label: month_abbrev(&date),
        });
    }
    ticks
}

fn et_series(rows: &[EtRow], column: EtColumn) -> LineSeries {
    LineSeries {
        name: column.header().to_string(),
        points: rows
            .iter()
            .map(|r| LinePoint {
                date: r.date.clone(),
                value: r.value(column),
            })
            .collect(),
    }
}

/// Model, MODIS and Noah ET for the selected year, whichever the file carries.
pub fn et_chart(db: &Database, sel: &SelectionState) -> View<LineChart> {
    build_et_chart(db, sel).into()
}

fn build_et_chart(db: &Database, sel: &SelectionState) -> Result<LineChart, Placeholder> {
    let no_data = || Placeholder::new(PlaceholderKind::NoData, "No data available");
    let (watershed, year) = selected(sel).ok_or_else(no_data)?;
    if !db.has_source(watershed, SourceKind::Et).or_unavailable("ET data")? {
        return Err(no_data());
    }

    let rows = db.query_et_year(watershed, year).or_unavailable("ET data")?;
    let empty = || {
        Placeholder::new(
            PlaceholderKind::NoData,
            format!("No data available for {} in year {}", watershed, year),
        )
    };
    if rows.is_empty() {
        return Err(empty());
    }

    let columns = present_et_columns(&db.et_columns(watershed).or_unavailable("ET data")?);
    let y_range = axis::y_range(
        rows.iter()
            .flat_map(|r| columns.iter().map(move |c| r.value(*c))),
    )
    .ok_or_else(empty)?;
    log::debug!("views: ET chart for {} {} over {} days", watershed, year, rows.len());

    Ok(LineChart {
        x_label: X_LABEL.to_string(),
        y_label: ET_Y_LABEL.to_string(),
        series: columns.iter().map(|c| et_series(&rows, *c)).collect(),
        y_range,
        month_ticks: month_ticks(rows.iter().map(|r| r.date.as_str())),
    })
}

/// Whichever discharge series the watershed carries, for the selected year.
pub fn discharge_chart(db: &Database, sel: &SelectionState) -> View<LineChart> {
    build_discharge_chart(db, sel).into()
}

fn build_discharge_chart(db: &Database, sel: &SelectionState) -> Result<LineChart, Placeholder> {
    let no_data = || Placeholder::new(PlaceholderKind::NoData, "No discharge data available");
    let (watershed, year) = selected(sel).ok_or_else(no_data)?;
    if !db
        .has_source(watershed, SourceKind::Discharge)
        .or_unavailable("discharge data")?
    {
        return Err(no_data());
    }

    let data = db
        .query_discharge_year(watershed, year)
        .or_unavailable("discharge data")?;
    let empty = || {
        Placeholder::new(
            PlaceholderKind::NoData,
            format!("No discharge data available for {} in year {}", watershed, year),
        )
    };
    if data.rows.is_empty() {
        return Err(empty());
    }
    if data.columns.is_empty() {
        return Err(Placeholder::new(
            PlaceholderKind::ColumnsNotFound,
            "Discharge columns not found in data",
        ));
    }

    let y_range = axis::y_range(data.rows.iter().flat_map(|r| r.values.iter().copied()))
        .ok_or_else(empty)?;
    let series = data
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| LineSeries {
            name: column.header().to_string(),
            points: data
                .rows
                .iter()
                .map(|r| LinePoint {
                    date: r.date.clone(),
                    value: r.values[i],
                })
                .collect(),
        })
        .collect();
    log::debug!(
        "views: discharge chart for {} {} with {} series",
        watershed,
        year,
        data.columns.len()
    );

    Ok(LineChart {
        x_label: X_LABEL.to_string(),
        y_label: DISCHARGE_Y_LABEL.to_string(),
        series,
        y_range,
        month_ticks: month_ticks(data.rows.iter().map(|r| r.date.as_str())),
    })
}
