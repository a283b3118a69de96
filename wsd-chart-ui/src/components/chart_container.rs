//! Chart container component that swaps in a placeholder when a view is empty.

use dioxus::prelude::*;

use super::PlaceholderMessage;

/// Props for ChartContainer
#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// The DOM id for the chart container (D3 or Leaflet renders into this)
    pub id: String,
    /// Message shown instead of the chart when the view has nothing to draw
    #[props(default = None)]
    pub placeholder: Option<String>,
    /// Optional minimum height in pixels
    #[props(default = 400)]
    pub min_height: u32,
}

/// A container div for rendered views, or the view's placeholder message.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; position: relative; width: 100%;",
        props.min_height
    );

    rsx! {
        div {
            style: "{style}",
            if let Some(message) = props.placeholder.clone() {
                PlaceholderMessage { message }
            } else {
                div {
                    id: "{props.id}",
                    style: "width: 100%;",
                }
            }
        }
    }
}
