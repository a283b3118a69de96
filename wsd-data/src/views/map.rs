//! Choropleth of a watershed's cells coloured by one attribute.

use serde::Serialize;
use serde_json::Value;
use wsd_core::SourceKind;
use wsd_db::Database;

use super::palette::{self, DEFAULT_FILL};
use super::{OrUnavailable, Placeholder, PlaceholderKind, View};
use crate::selection::SelectionState;

pub const ZOOM_START: u8 = 10;

/// Base style of every cell outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellStyle {
    pub color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

/// Style applied while the pointer is over a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightStyle {
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub weight: f64,
}

pub const CELL_STYLE: CellStyle = CellStyle {
    color: "#2d5f4a",
    weight: 0.0,
    fill_opacity: 0.6,
};

pub const HIGHLIGHT_STYLE: HighlightStyle = HighlightStyle {
    fill_color: "#ffff00",
    fill_opacity: 0.8,
    weight: 3.0,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// A drawable cell with its resolved fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeature {
    pub fill_color: String,
    /// Tooltip text: the field value, empty when the cell lacks it.
    pub tooltip: String,
    pub properties: serde_json::Map<String, Value>,
    pub geometry: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMap {
    pub field: String,
    /// `[lat, lon]` of the bounding box centre.
    pub center: [f64; 2],
    /// `[[south, west], [north, east]]`, ready for Leaflet's `fitBounds`.
    pub bounds: [[f64; 2]; 2],
    pub zoom_start: u8,
    pub tooltip_alias: String,
    pub features: Vec<MapFeature>,
    pub legend: Vec<LegendEntry>,
    pub style: CellStyle,
    pub highlight: HighlightStyle,
}

/// Legend text for an attribute value; strings are shown unquoted.
pub fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Distinct non-null values in order of first appearance, each with its colour.
pub fn assign_colors<'a, I>(values: I) -> Vec<(Value, &'static str)>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut distinct: Vec<Value> = Vec::new();
    for v in values {
        if !v.is_null() && !distinct.contains(v) {
            distinct.push(v.clone());
        }
    }
    let colors = palette::colors(distinct.len());
    distinct.into_iter().zip(colors).collect()
}

/// Cells of the selected watershed coloured by the selected field.
pub fn watershed_map(db: &Database, sel: &SelectionState) -> View<ChoroplethMap> {
    build_map(db, sel).into()
}

fn build_map(db: &Database, sel: &SelectionState) -> Result<ChoroplethMap, Placeholder> {
    let unavailable = || {
        Placeholder::new(
            PlaceholderKind::MapUnavailable,
            "Map not available for this watershed",
        )
    };
    let watershed = sel.watershed.as_deref().ok_or_else(unavailable)?;
    if !db
        .has_source(watershed, SourceKind::Geometry)
        .or_unavailable("geometry")?
    {
        return Err(unavailable());
    }

    let cells = db.query_cells(watershed).or_unavailable("geometry")?;
    let extent = db.cell_bounds(watershed).or_unavailable("geometry")?;
    let extent = match extent {
        Some(e) if !cells.is_empty() => e,
        _ => {
            return Err(Placeholder::new(
                PlaceholderKind::NoData,
                "No geometry data available",
            ))
        }
    };

    let Some(field) = sel.color_field.as_deref() else {
        return Err(Placeholder::new(
            PlaceholderKind::SelectionIncomplete,
            "Select a field to visualize",
        ));
    };
    let columns = db.cell_columns(watershed).or_unavailable("geometry")?;
    if !columns.iter().any(|c| c == field) {
        return Err(Placeholder::new(
            PlaceholderKind::FieldNotFound,
            format!("Field '{}' not found in data", field),
        ));
    }

    let assigned = assign_colors(cells.iter().filter_map(|c| c.properties.get(field)));
    let fill_for = |value: Option<&Value>| {
        value
            .and_then(|v| assigned.iter().find(|(a, _)| a == v))
            .map(|(_, color)| *color)
            .unwrap_or(DEFAULT_FILL)
            .to_string()
    };

    let features = cells
        .into_iter()
        .filter_map(|cell| {
            let geometry = cell.geometry?;
            let value = cell.properties.get(field);
            Some(MapFeature {
                fill_color: fill_for(value),
                tooltip: value
                    .filter(|v| !v.is_null())
                    .map(value_label)
                    .unwrap_or_default(),
                properties: cell.properties,
                geometry,
            })
        })
        .collect::<Vec<_>>();

    let legend = assigned
        .iter()
        .map(|(value, color)| LegendEntry {
            label: value_label(value),
            color: color.to_string(),
        })
        .collect::<Vec<_>>();

    let b = extent.bounds;
    let (center_lat, center_lon) = b.center();
    log::debug!(
        "views: map for {} coloured by {} ({} features, {} legend entries)",
        watershed,
        field,
        features.len(),
        legend.len()
    );

    Ok(ChoroplethMap {
        field: field.to_string(),
        center: [center_lat, center_lon],
        bounds: [[b.min_lat, b.min_lon], [b.max_lat, b.max_lon]],
        zoom_start: ZOOM_START,
        tooltip_alias: format!("{}:", field),
        features,
        legend,
        style: CELL_STYLE,
        highlight: HIGHLIGHT_STYLE,
    })
}
