//! Error and load-warning displays.

use crate::state::AppState;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
}

/// Displays an error message in a styled box.
#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        div {
            style: "padding: 12px 16px; margin: 8px 0; background: #FFEBEE; color: #C62828; border-radius: 4px; border: 1px solid #EF9A9A;",
            strong { "Error: " }
            "{props.message}"
        }
    }
}

/// Lists sub-tables that failed to load. Renders nothing when all loaded.
#[component]
pub fn LoadWarnings() -> Element {
    let state = use_context::<AppState>();
    let warnings = state.warnings.read().clone();
    if warnings.is_empty() {
        return rsx! {};
    }

    rsx! {
        details {
            style: "padding: 8px 12px; margin: 8px 0; background: #FFF8E1; color: #8D6E00; border-radius: 4px; border: 1px solid #FFE082; font-size: 12px;",
            summary { "{warnings.len()} data file(s) could not be loaded" }
            ul {
                style: "margin: 4px 0 0 0; padding-left: 18px;",
                for warning in warnings.iter() {
                    li { "{warning}" }
                }
            }
        }
    }
}
