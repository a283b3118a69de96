//! Derived views: pure functions from (registry, selection) to render-ready data.
//!
//! Every view filters by the selected watershed and year, sorts by date and
//! returns either a ready artifact or a [`Placeholder`] explaining what is
//! missing. Nothing here returns an error; failures become placeholders.

pub mod axis;
pub mod chart;
pub mod map;
pub mod palette;
pub mod table;

use serde::Serialize;

use crate::selection::SelectionState;

pub use chart::{discharge_chart, et_chart, LineChart, LinePoint, LineSeries, MonthTick};
pub use map::{watershed_map, ChoroplethMap, LegendEntry, MapFeature};
pub use table::{et_table, TablePreview};

/// Why a view has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// No rows for the selection, or the source is absent
    NoData,
    /// Watershed or year not selected yet
    SelectionIncomplete,
    /// Colour field is not an attribute of the cells
    FieldNotFound,
    /// None of the candidate discharge columns exist
    ColumnsNotFound,
    /// The watershed has no usable geometry
    MapUnavailable,
    /// The registry could not be queried
    Unavailable,
}

/// User-facing "not available" message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub message: String,
}

impl Placeholder {
    pub fn new(kind: PlaceholderKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of a derived view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum View<T> {
    Ready(T),
    Placeholder(Placeholder),
}

impl<T> View<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            View::Ready(t) => Some(t),
            View::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            View::Ready(_) => None,
            View::Placeholder(p) => Some(p),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, View::Ready(_))
    }
}

impl<T> From<Result<T, Placeholder>> for View<T> {
    fn from(result: Result<T, Placeholder>) -> Self {
        match result {
            Ok(t) => View::Ready(t),
            Err(p) => View::Placeholder(p),
        }
    }
}

/// The selected (watershed, year) pair, if both are set.
pub(crate) fn selected(sel: &SelectionState) -> Option<(&str, i32)> {
    Some((sel.watershed.as_deref()?, sel.year?))
}

/// Turn a registry error into an `Unavailable` placeholder.
pub(crate) trait OrUnavailable<T> {
    fn or_unavailable(self, what: &str) -> Result<T, Placeholder>;
}

impl<T> OrUnavailable<T> for anyhow::Result<T> {
    fn or_unavailable(self, what: &str) -> Result<T, Placeholder> {
        self.map_err(|e| {
            log::error!("views: failed to read {}: {:#}", what, e);
            Placeholder::new(
                PlaceholderKind::Unavailable,
                format!("{} could not be read", what),
            )
        })
    }
}
