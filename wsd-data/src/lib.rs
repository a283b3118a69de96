//! Selection state, derived views and exports for the watershed ET dashboard.
//!
//! This crate sits between the dataset registry ([`wsd_db::Database`]) and
//! whatever renders the dashboard. Nothing here depends on a UI toolkit:
//!
//! - [`selection`] holds the selector values and the pure reducer that
//!   cascades a watershed change into fresh year and colour-field options
//! - [`views`] turns (registry, selection) into charts, a preview table and
//!   a choropleth map, or a placeholder saying what is missing
//! - [`export`] produces the CSV and ZIP downloads

pub mod export;
pub mod selection;
pub mod views;

pub use export::{combined_export, discharge_export, et_export, Download, ExportKind};
pub use selection::{cascade, Cascade, SelectionCatalog, SelectionEvent, SelectionState};
pub use views::{Placeholder, PlaceholderKind, View};
