//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The D3.js chart/table functions and the Leaflet map function live in
//! `assets/js/*.js` and are loaded at runtime. They are evaluated as globals
//! (no ES modules) and exposed via `window.*`. This module serializes view
//! artifacts and calls those globals, and saves downloads through a Blob URL.

use wasm_bindgen::{JsCast, JsValue};
use wsd_data::Download;

// Embed all chart JS files at compile time
static LINE_CHART_JS: &str = include_str!("../assets/js/line-chart.js");
static DATA_TABLE_JS: &str = include_str!("../assets/js/data-table.js");
static CHOROPLETH_MAP_JS: &str = include_str!("../assets/js/choropleth-map.js");

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('WSD JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// JS string literal holding `text`, safe to splice into generated code.
fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "''".to_string())
}

/// Initialize chart scripts with a wait-for-libraries polling loop.
///
/// The scripts define `renderLineChart`, `renderDataTable` and
/// `renderChoroplethMap` via `function` declarations. They are evaluated at
/// global scope through an indirect `eval()` once both D3 and Leaflet are
/// present, then promoted to `window.*` explicitly. Safe to call repeatedly.
pub fn init_charts() {
    let all_js = [LINE_CHART_JS, DATA_TABLE_JS, CHOROPLETH_MAP_JS].join("\n");

    // Store the scripts on window so the polling callback can eval them
    // at global scope (not block-scoped inside setInterval).
    let store_js = format!(
        "if (!window.__wsdChartsReady && !window.__wsdChartScripts) {{ window.__wsdChartScripts = {}; }}",
        js_string(&all_js)
    );
    let _ = js_sys::eval(&store_js);

    let init_js = r#"
        (function() {
            if (window.__wsdChartsReady || window.__wsdChartsPolling) return;
            window.__wsdChartsPolling = true;
            var waitForLibs = setInterval(function() {
                if (typeof d3 !== 'undefined' && typeof L !== 'undefined') {
                    clearInterval(waitForLibs);
                    (0, eval)(window.__wsdChartScripts);
                    delete window.__wsdChartScripts;
                    if (typeof renderLineChart !== 'undefined') window.renderLineChart = renderLineChart;
                    if (typeof renderDataTable !== 'undefined') window.renderDataTable = renderDataTable;
                    if (typeof renderChoroplethMap !== 'undefined') window.renderChoroplethMap = renderChoroplethMap;
                    if (typeof destroyChoroplethMap !== 'undefined') window.destroyChoroplethMap = destroyChoroplethMap;
                    window.__wsdChartsReady = true;
                    console.log('WSD charts initialized');
                }
            }, 100);
        })();
    "#;
    let _ = js_sys::eval(init_js);
}

/// JS statement that stops any pending render poll for the container `id` (a JS literal).
fn cancel_poll_js(id: &str) -> String {
    format!(
        "window.__wsdPolls = window.__wsdPolls || {{}}; \
         if (window.__wsdPolls[{id}]) {{ clearInterval(window.__wsdPolls[{id}]); delete window.__wsdPolls[{id}]; }}",
    )
}

/// Code that polls until the scripts are loaded and the container exists, then calls `function`.
///
/// At most one poll is pending per container; a newer render replaces it.
fn render_js(function: &str, container_id: &str, data_json: &str) -> String {
    let id = js_string(container_id);
    let data = js_string(data_json);
    let cancel = cancel_poll_js(&id);
    format!(
        r#"
        (function() {{
            {cancel}
            var poll = setInterval(function() {{
                if (window.__wsdChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById({id})) {{
                    clearInterval(poll);
                    delete window.__wsdPolls[{id}];
                    try {{
                        window.{function}({id}, {data});
                    }} catch(e) {{ console.error('[WSD] {function} error:', e); }}
                }}
            }}, 100);
            window.__wsdPolls[{id}] = poll;
        }})();
        "#,
    )
}

fn render_when_ready(function: &str, container_id: &str, data_json: &str) {
    call_js(&render_js(function, container_id, data_json));
}

/// Render a multi-series line chart from a serialized `LineChart`.
pub fn render_line_chart(container_id: &str, data_json: &str) {
    render_when_ready("renderLineChart", container_id, data_json);
}

/// Render the preview table from a serialized `TablePreview`.
pub fn render_data_table(container_id: &str, data_json: &str) {
    render_when_ready("renderDataTable", container_id, data_json);
}

/// Render the Leaflet choropleth from a serialized `ChoroplethMap`.
pub fn render_choropleth_map(container_id: &str, data_json: &str) {
    render_when_ready("renderChoroplethMap", container_id, data_json);
}

fn destroy_js(container_id: &str) -> String {
    let id = js_string(container_id);
    let cancel = cancel_poll_js(&id);
    format!(
        "{cancel} \
         if (window.destroyChoroplethMap) window.destroyChoroplethMap({id}); \
         var el = document.getElementById({id}); if (el) el.innerHTML = '';",
    )
}

/// Destroy/clean up a chart or map in the given container, cancelling any pending render.
pub fn destroy_chart(container_id: &str) {
    call_js(&destroy_js(container_id));
}

fn save_blob(download: &Download) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(download.bytes.as_slice()));
    let bag = web_sys::BlobPropertyBag::new();
    bag.set_type(download.mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &bag)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&download.filename);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}

/// Hand `download` to the browser as a file save.
pub fn trigger_download(download: &Download) {
    match save_blob(download) {
        Ok(()) => log::info!(
            "download: {} ({} bytes)",
            download.filename,
            download.bytes.len()
        ),
        Err(e) => log::warn!("download of {} failed: {:?}", download.filename, e),
    }
}
