//! The three dashboard selectors.
//!
//! Each one dispatches a [`SelectionEvent`] instead of writing its own
//! signal, so a watershed change replaces the year and colour field options
//! in the same update.

use crate::state::AppState;
use dioxus::prelude::*;
use wsd_data::SelectionEvent;

const LABEL_STYLE: &str = "font-weight: bold; margin-right: 8px;";

/// Watershed dropdown, in registration order.
#[component]
pub fn WatershedSelector() -> Element {
    let mut state = use_context::<AppState>();
    let names: Vec<String> = state.catalog.read().names().map(String::from).collect();
    let selected = state.selection.read().watershed.clone().unwrap_or_default();

    let on_change = move |evt: Event<FormData>| {
        state.dispatch(SelectionEvent::WatershedChanged(evt.value()));
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "watershed-select",
                style: LABEL_STYLE,
                "Select watershed"
            }
            select {
                id: "watershed-select",
                onchange: on_change,
                for name in names.iter() {
                    option {
                        value: "{name}",
                        selected: *name == selected,
                        "{name}"
                    }
                }
            }
        }
    }
}

/// Year dropdown, options taken from the selected watershed's ET series.
#[component]
pub fn YearSelector() -> Element {
    let mut state = use_context::<AppState>();
    let years = state.selection.read().year_options.clone();
    let selected = state.selection.read().year;

    let on_change = move |evt: Event<FormData>| match evt.value().parse::<i32>() {
        Ok(year) => state.dispatch(SelectionEvent::YearChanged(year)),
        Err(_) => log::warn!("ignoring non-numeric year '{}'", evt.value()),
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "year-select",
                style: LABEL_STYLE,
                "Select year"
            }
            select {
                id: "year-select",
                disabled: years.is_empty(),
                onchange: on_change,
                for year in years.iter() {
                    option {
                        value: "{year}",
                        selected: Some(*year) == selected,
                        "{year}"
                    }
                }
            }
        }
    }
}

/// Map colour field dropdown, options taken from the watershed's cell attributes.
#[component]
pub fn ColorFieldSelector() -> Element {
    let mut state = use_context::<AppState>();
    let fields = state.selection.read().color_field_options.clone();
    let selected = state.selection.read().color_field.clone();

    let on_change = move |evt: Event<FormData>| {
        state.dispatch(SelectionEvent::ColorFieldChanged(evt.value()));
    };

    rsx! {
        div {
            style: "margin: 5px 10px; display: flex; align-items: center;",
            label {
                r#for: "color-field-select",
                style: LABEL_STYLE,
                "Select field to visualize:"
            }
            select {
                id: "color-field-select",
                disabled: fields.is_empty(),
                onchange: on_change,
                for field in fields.iter() {
                    option {
                        value: "{field}",
                        selected: selected.as_deref() == Some(field.as_str()),
                        "{field}"
                    }
                }
            }
        }
    }
}
