//! Query result model structs.
//!
//! All structs derive `Serialize` so the web frontend can hand them to
//! D3.js/Leaflet as JSON.

use serde::Serialize;
use wsd_core::{DischargeColumn, EtColumn, GeoBoundingBox, SourceKind};

/// Outcome of loading one sub-table of one watershed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceStatus {
    pub watershed: String,
    pub kind: SourceKind,
    /// Configured path, `None` when the watershed omits this source.
    pub path: Option<String>,
    pub loaded: bool,
    /// Records (or cells) stored.
    pub rows: usize,
    /// Load failure description, if any.
    pub message: Option<String>,
}

/// One daily ET row with its date as an ISO string.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EtRow {
    pub date: String,
    pub model_et: Option<f64>,
    pub modis_et: Option<f64>,
    pub noah_et: Option<f64>,
    /// Non-ET cells as text, lining up with the `Extra` fields of the stored headers.
    pub extra: Vec<String>,
}

impl EtRow {
    pub fn value(&self, column: EtColumn) -> Option<f64> {
        match column {
            EtColumn::ModelCalculated => self.model_et,
            EtColumn::Modis => self.modis_et,
            EtColumn::NoahLsm => self.noah_et,
        }
    }
}

/// One daily discharge row; `values` lines up with [`DischargeYear::columns`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DischargeRow {
    pub date: String,
    pub values: Vec<Option<f64>>,
}

/// A watershed's discharge rows for one year, restricted to present columns.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DischargeYear {
    pub columns: Vec<DischargeColumn>,
    pub rows: Vec<DischargeRow>,
}

/// A stored cell: attribute map plus WGS84 GeoJSON geometry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CellRow {
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: Option<serde_json::Value>,
}

/// Cached extent of a watershed's cells.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CellExtent {
    pub bounds: GeoBoundingBox,
    /// CRS the file was reprojected from, e.g. `EPSG:32616`.
    pub source_crs: String,
}
