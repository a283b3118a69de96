//! Shared Dioxus components and the D3.js/Leaflet bridge for the watershed dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the chart, table and map scripts via `js_sys::eval()`
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (selectors, containers, legend, downloads)

pub mod js_bridge;
pub mod state;
pub mod components;
