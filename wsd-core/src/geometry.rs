//! Watershed cell polygons read from GeoJSON and brought to WGS84.

use geojson::{FeatureCollection, GeoJson, Geometry, JsonObject, Value};

use crate::projection::{Crs, GeoBoundingBox, GeometryError};

/// One cell: its attribute map and WGS84 geometry as GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub properties: JsonObject,
    pub geometry: Option<serde_json::Value>,
}

/// A watershed's cells after reprojection.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLayer {
    /// Attribute names in order of first appearance across features.
    pub columns: Vec<String>,
    pub cells: Vec<Cell>,
    /// `None` when no feature carries coordinates.
    pub bounds: Option<GeoBoundingBox>,
    pub source_crs: Crs,
}

/// CRS named by the legacy `crs` member: `{"type":"name","properties":{"name":...}}`.
fn declared_crs(fc: &FeatureCollection) -> Option<&str> {
    fc.foreign_members
        .as_ref()?
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
}

fn reproject_position(
    crs: &Crs,
    position: &mut [f64],
    bounds: &mut Option<GeoBoundingBox>,
) -> Result<(), GeometryError> {
    if position.len() < 2 {
        return Err(GeometryError::ShortPosition(position.len()));
    }
    let (lon, lat) = crs.to_lon_lat(position[0], position[1]);
    position[0] = lon;
    position[1] = lat;
    match bounds {
        Some(b) => b.include(lon, lat),
        None => *bounds = Some(GeoBoundingBox::from_point(lon, lat)),
    }
    Ok(())
}

fn reproject_value(
    crs: &Crs,
    value: &mut Value,
    bounds: &mut Option<GeoBoundingBox>,
) -> Result<(), GeometryError> {
    match value {
        Value::Point(p) => reproject_position(crs, p, bounds)?,
        Value::MultiPoint(points) | Value::LineString(points) => {
            for p in points.iter_mut() {
                reproject_position(crs, p, bounds)?;
            }
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            for line in lines.iter_mut() {
                for p in line.iter_mut() {
                    reproject_position(crs, p, bounds)?;
                }
            }
        }
        Value::MultiPolygon(polygons) => {
            for ring in polygons.iter_mut().flatten() {
                for p in ring.iter_mut() {
                    reproject_position(crs, p, bounds)?;
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries.iter_mut() {
                reproject_value(crs, &mut g.value, bounds)?;
            }
        }
    }
    Ok(())
}

/// Parse a GeoJSON FeatureCollection and reproject every coordinate to WGS84.
///
/// The source CRS comes from the file's `crs` member when present, then from
/// `fallback_crs`, then defaults to WGS84.
pub fn parse_cells(data: &[u8], fallback_crs: Option<&str>) -> anyhow::Result<CellLayer> {
    let text = std::str::from_utf8(data)
        .map_err(|e| GeometryError::GeoJson(format!("not UTF-8: {}", e)))?;
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| GeometryError::GeoJson(e.to_string()))?;
    let fc = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(GeometryError::NotFeatureCollection("Feature").into()),
        GeoJson::Geometry(_) => return Err(GeometryError::NotFeatureCollection("Geometry").into()),
    };

    let crs = match declared_crs(&fc).or(fallback_crs) {
        Some(name) => Crs::parse(name)?,
        None => Crs::Wgs84,
    };

    let mut columns: Vec<String> = Vec::new();
    let mut bounds = None;
    let mut cells = Vec::with_capacity(fc.features.len());
    for feature in fc.features {
        let properties = feature.properties.unwrap_or_default();
        for key in properties.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        let geometry = match feature.geometry {
            Some(mut g) => {
                reproject_value(&crs, &mut g.value, &mut bounds)?;
                let g = Geometry::new(g.value);
                Some(serde_json::to_value(&g)?)
            }
            None => None,
        };
        cells.push(Cell {
            properties,
            geometry,
        });
    }

    log::debug!(
        "parsed {} cells from {} with {} attribute columns",
        cells.len(),
        crs,
        columns.len()
    );
    Ok(CellLayer {
        columns,
        cells,
        bounds,
        source_crs: crs,
    })
}
