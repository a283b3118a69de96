//! Download button for one export of the current selection.

use crate::js_bridge;
use crate::state::AppState;
use dioxus::prelude::*;
use wsd_data::{ExportKind, View};

#[derive(Props, Clone, PartialEq)]
pub struct DownloadButtonProps {
    pub kind: ExportKind,
}

fn button_color(kind: ExportKind) -> &'static str {
    match kind {
        ExportKind::Et => "#2E7D32",
        ExportKind::Discharge => "#1565C0",
        ExportKind::All => "#EF6C00",
    }
}

/// A save button, or the reason there is nothing to save.
///
/// The payload is rebuilt whenever the selection changes so a click always
/// saves the full year currently shown.
#[component]
pub fn DownloadButton(props: DownloadButtonProps) -> Element {
    let state = use_context::<AppState>();
    let kind = props.kind;

    let download = use_memo(move || {
        let selection = state.selection.read();
        match &*state.db.read() {
            Some(db) => Some(kind.build(db, &selection)),
            None => None,
        }
    });

    let view = download.read().clone();
    match view {
        None => rsx! {},
        Some(View::Placeholder(p)) => rsx! {
            p {
                style: "margin: 6px 0; font-size: 13px; font-style: italic; color: #666;",
                "{p.message}"
            }
        },
        Some(View::Ready(file)) => {
            let style = format!(
                "display: block; width: 100%; margin: 6px 0; padding: 8px 12px; border: none; border-radius: 4px; color: white; cursor: pointer; background: {};",
                button_color(kind)
            );
            rsx! {
                button {
                    style: "{style}",
                    title: "{file.filename}",
                    onclick: move |_| js_bridge::trigger_download(&file),
                    "{kind.label()}"
                }
            }
        }
    }
}
