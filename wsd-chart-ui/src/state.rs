//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.
//!
//! Selector changes go through [`AppState::dispatch`], which runs the pure
//! reducer from `wsd_data` and writes the whole new selection in one `set`, so
//! every view effect sees the watershed, year and colour field change together.

use dioxus::prelude::*;
use wsd_core::config::DEFAULT_PREVIEW_ROWS;
use wsd_data::{SelectionCatalog, SelectionEvent, SelectionState};
use wsd_db::Database;

/// Shared application state for the dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Database instance (None until loaded)
    pub db: Signal<Option<Database>>,
    /// Option sets per watershed, fixed after loading
    pub catalog: Signal<SelectionCatalog>,
    /// Current selector values and their option lists
    pub selection: Signal<SelectionState>,
    /// Whether the app is still loading
    pub loading: Signal<bool>,
    /// Error message if the registry could not be built at all
    pub error_msg: Signal<Option<String>>,
    /// Sub-tables that failed to load
    pub warnings: Signal<Vec<String>>,
    /// Rows shown in the ET preview table
    pub preview_rows: Signal<usize>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            db: Signal::new(None),
            catalog: Signal::new(SelectionCatalog::default()),
            selection: Signal::new(SelectionState::default()),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            warnings: Signal::new(Vec::new()),
            preview_rows: Signal::new(DEFAULT_PREVIEW_ROWS),
        }
    }

    /// Apply one selector event to the current selection.
    pub fn dispatch(&mut self, event: SelectionEvent) {
        let next = {
            let catalog = self.catalog.read();
            self.selection.read().apply(&catalog, event)
        };
        if next != *self.selection.peek() {
            self.selection.set(next);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
