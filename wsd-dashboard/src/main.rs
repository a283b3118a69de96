//! Watershed ET Dashboard
//!
//! Compares daily evapotranspiration from the AnnAGNPS model, MODIS and the
//! Noah land surface model for one watershed and year, next to observed and
//! modelled discharge and a map of the watershed's cells coloured by any
//! attribute.
//!
//! Data flow:
//! 1. `build.rs` copies `watersheds.json` and the files it names into `OUT_DIR`.
//! 2. `include_bytes!` embeds them into the WASM binary.
//! 3. On mount, every watershed is loaded into an in-memory SQLite registry;
//!    a file that fails to load is reported and skipped.
//! 4. Selector changes run through the selection reducer, and each view is
//!    recomputed from (registry, selection) and handed to D3.js or Leaflet.

use dioxus::prelude::*;
use serde::Serialize;
use wsd_chart_ui::components::{
    ChartContainer, ChartHeader, ColorFieldSelector, DownloadButton, ErrorDisplay, LoadWarnings,
    LoadingSpinner, MapLegend, WatershedSelector, YearSelector,
};
use wsd_chart_ui::js_bridge;
use wsd_chart_ui::state::AppState;
use wsd_core::{DashboardConfig, MemoryReader};
use wsd_data::views::{discharge_chart, et_chart, et_table, watershed_map};
use wsd_data::{ExportKind, SelectionCatalog, SelectionState, View};
use wsd_db::Database;

mod embedded {
    include!(concat!(env!("OUT_DIR"), "/embedded_sources.rs"));
}

const ET_CHART_ID: &str = "et-chart";
const ET_TABLE_ID: &str = "et-table";
const MAP_ID: &str = "watershed-map";
const DISCHARGE_CHART_ID: &str = "discharge-chart";

const D3_JS: &str = "https://d3js.org/d3.v7.min.js";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";

const ACCENT: &str = "#88d8b0";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("watershed-dashboard-root"))
        .launch(App);
}

fn embedded_reader() -> MemoryReader {
    let mut reader = MemoryReader::new();
    for (path, bytes) in embedded::EMBEDDED_SOURCES {
        reader.insert(*path, *bytes);
    }
    reader
}

/// Build the registry and catalog from the bundled files.
fn load_dashboard(mut state: AppState) -> anyhow::Result<()> {
    let config = DashboardConfig::from_json(embedded::EMBEDDED_CONFIG)?;
    let db = Database::new()?;
    let report = db.load_watersheds_with(&config, &embedded_reader())?;
    let catalog = SelectionCatalog::from_database(&db, &config.preferred_color_field)?;
    log::info!(
        "dashboard: {} watersheds registered, {} load warnings",
        report.registered.len(),
        report.warnings.len()
    );

    state.selection.set(SelectionState::initial(&catalog));
    state.catalog.set(catalog);
    state.warnings.set(report.warnings);
    state.preview_rows.set(config.preview_rows);
    state.db.set(Some(db));
    Ok(())
}

/// Render a ready view with `render`, or clear the container.
fn sync_view<T: Serialize>(view: Option<&View<T>>, container_id: &str, render: fn(&str, &str)) {
    match view {
        Some(View::Ready(artifact)) => {
            js_bridge::init_charts();
            let data_json = serde_json::to_string(artifact).unwrap_or_default();
            render(container_id, &data_json);
        }
        _ => js_bridge::destroy_chart(container_id),
    }
}

fn placeholder_text<T>(view: Option<&View<T>>) -> Option<String> {
    view.and_then(|v| v.placeholder())
        .map(|p| p.message.clone())
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);

    // Initialize database on mount
    use_effect(move || {
        if let Err(e) = load_dashboard(state) {
            log::error!("Failed to load dashboard data: {:#}", e);
            state
                .error_msg
                .set(Some(format!("Failed to load watershed data: {:#}", e)));
        }
        state.loading.set(false);
    });

    // Derived views; each recomputes when the registry or selection changes
    let et_view = use_memo(move || {
        let selection = state.selection.read();
        state.db.read().as_ref().map(|db| et_chart(db, &selection))
    });
    let table_view = use_memo(move || {
        let selection = state.selection.read();
        let rows = (state.preview_rows)();
        state
            .db
            .read()
            .as_ref()
            .map(|db| et_table(db, &selection, rows))
    });
    let map_view = use_memo(move || {
        let selection = state.selection.read();
        state.db.read().as_ref().map(|db| watershed_map(db, &selection))
    });
    let discharge_view = use_memo(move || {
        let selection = state.selection.read();
        state
            .db
            .read()
            .as_ref()
            .map(|db| discharge_chart(db, &selection))
    });

    use_effect(move || {
        sync_view(et_view.read().as_ref(), ET_CHART_ID, js_bridge::render_line_chart);
    });
    use_effect(move || {
        sync_view(table_view.read().as_ref(), ET_TABLE_ID, js_bridge::render_data_table);
    });
    use_effect(move || {
        sync_view(map_view.read().as_ref(), MAP_ID, js_bridge::render_choropleth_map);
    });
    use_effect(move || {
        sync_view(
            discharge_view.read().as_ref(),
            DISCHARGE_CHART_ID,
            js_bridge::render_line_chart,
        );
    });

    let legend = map_view
        .read()
        .as_ref()
        .and_then(|v| v.ready())
        .map(|m| (m.field.clone(), m.legend.clone()));
    let preview_rows = (state.preview_rows)();

    rsx! {
        document::Script { src: D3_JS }
        document::Stylesheet { href: LEAFLET_CSS }
        document::Script { src: LEAFLET_JS }

        div {
            style: "font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            header {
                style: "padding: 12px 16px; background: {ACCENT}; color: #1B3A2F;",
                h2 { style: "margin: 0;", "Watershed ET Dashboard" }
            }

            if let Some(err) = (state.error_msg)() {
                ErrorDisplay { message: err }
            } else if (state.loading)() {
                LoadingSpinner {}
            } else {
                div {
                    style: "display: flex; gap: 16px; padding: 16px;",

                    aside {
                        style: "flex: 0 0 260px;",
                        h3 { style: "margin: 0 0 4px 0;", "ET Time Series" }
                        p { style: "font-size: 13px;", "Daily ET from AnnAGNPS, MODIS, and Noah LSM." }
                        h4 { "Settings" }
                        WatershedSelector {}
                        YearSelector {}
                        hr {}
                        h4 { "Download Data" }
                        p {
                            style: "font-size: 12px; font-style: italic;",
                            "Download data for selected watershed and year"
                        }
                        DownloadButton { kind: ExportKind::Et }
                        DownloadButton { kind: ExportKind::Discharge }
                        hr {}
                        DownloadButton { kind: ExportKind::All }
                        LoadWarnings {}
                    }

                    main {
                        style: "flex: 1; min-width: 0;",

                        div {
                            style: "display: flex; flex-wrap: wrap; gap: 24px;",
                            div {
                                style: "flex: 1 1 480px;",
                                ChartHeader { title: "Evapotranspiration".to_string() }
                                ChartContainer {
                                    id: ET_CHART_ID.to_string(),
                                    placeholder: placeholder_text(et_view.read().as_ref()),
                                    min_height: 350,
                                }
                            }
                            div {
                                style: "flex: 1 1 360px;",
                                ChartHeader { title: format!("First {} rows (preview)", preview_rows) }
                                ChartContainer {
                                    id: ET_TABLE_ID.to_string(),
                                    placeholder: placeholder_text(table_view.read().as_ref()),
                                    min_height: 200,
                                }
                            }
                        }

                        hr { style: "margin: 16px 0;" }

                        div {
                            style: "display: flex; flex-wrap: wrap; gap: 24px;",
                            div {
                                style: "flex: 1 1 480px;",
                                ChartHeader { title: "Watershed Map".to_string() }
                                ColorFieldSelector {}
                                ChartContainer {
                                    id: MAP_ID.to_string(),
                                    placeholder: placeholder_text(map_view.read().as_ref()),
                                    min_height: 450,
                                }
                                if let Some((field, entries)) = legend {
                                    MapLegend { field, entries }
                                }
                            }
                            div {
                                style: "flex: 1 1 480px;",
                                ChartHeader {
                                    title: "Discharge Comparison".to_string(),
                                    subtitle: "Observed Runoff vs Model Results".to_string(),
                                }
                                ChartContainer {
                                    id: DISCHARGE_CHART_ID.to_string(),
                                    placeholder: placeholder_text(discharge_view.read().as_ref()),
                                    min_height: 350,
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
