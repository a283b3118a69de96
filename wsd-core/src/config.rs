//! Dashboard configuration: which watersheds exist and where their files live.
//!
//! ```json
//! {
//!   "preferred_color_field": "mgmt_field_id",
//!   "preview_rows": 20,
//!   "watersheds": [
//!     {
//!       "name": "Yackanookany",
//!       "et": "yackanookany/merged_ET_data.csv",
//!       "discharge": "yackanookany/yac_cms_runoff_all.csv",
//!       "geometry": "yackanookany/cells_geometry.geojson",
//!       "geometry_crs": "EPSG:32616"
//!     }
//!   ]
//! }
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::columns::SourceKind;

/// Attribute used to colour the map when a watershed's geometry carries it.
pub const DEFAULT_COLOR_FIELD: &str = "mgmt_field_id";

/// Number of rows shown in the ET preview table.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

fn default_color_field() -> String {
    DEFAULT_COLOR_FIELD.to_string()
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

/// File locations for one named watershed. Any of the three may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatershedConfig {
    pub name: String,
    #[serde(default)]
    pub et: Option<PathBuf>,
    #[serde(default)]
    pub discharge: Option<PathBuf>,
    #[serde(default)]
    pub geometry: Option<PathBuf>,
    /// CRS to assume when the geometry file does not declare one (e.g. `"EPSG:32616"`).
    #[serde(default)]
    pub geometry_crs: Option<String>,
}

impl WatershedConfig {
    pub fn path(&self, kind: SourceKind) -> Option<&Path> {
        match kind {
            SourceKind::Et => self.et.as_deref(),
            SourceKind::Discharge => self.discharge.as_deref(),
            SourceKind::Geometry => self.geometry.as_deref(),
        }
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_color_field")]
    pub preferred_color_field: String,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    pub watersheds: Vec<WatershedConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preferred_color_field: default_color_field(),
            preview_rows: default_preview_rows(),
            watersheds: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Parse a configuration from a JSON string. Paths are left as written.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: DashboardConfig =
            serde_json::from_str(json).context("invalid dashboard configuration")?;
        Ok(config)
    }

    /// Read a configuration file; relative data paths are resolved against its directory.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&json)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base))
    }

    /// Prefix every relative data path with `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        for ws in self.watersheds.iter_mut() {
            resolve(&mut ws.et);
            resolve(&mut ws.discharge);
            resolve(&mut ws.geometry);
        }
        self
    }
}
