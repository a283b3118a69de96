//! Legend of the categorical map colours.

use dioxus::prelude::*;
use wsd_data::views::LegendEntry;

#[derive(Props, Clone, PartialEq)]
pub struct MapLegendProps {
    /// Coloured attribute name, used as the legend title
    pub field: String,
    pub entries: Vec<LegendEntry>,
}

/// One swatch per distinct value, in map order.
#[component]
pub fn MapLegend(props: MapLegendProps) -> Element {
    rsx! {
        div {
            style: "margin-top: 12px; padding: 8px 12px; background: #FAFAFA; border-radius: 4px; border: 1px solid #E0E0E0; font-size: 12px; max-height: 200px; overflow-y: auto;",
            div {
                style: "font-weight: bold; margin-bottom: 4px;",
                "{props.field}"
            }
            div {
                style: "display: flex; gap: 12px; flex-wrap: wrap;",
                for entry in props.entries.iter() {
                    div {
                        style: "display: flex; align-items: center; gap: 4px;",
                        span {
                            style: "display: inline-block; width: 14px; height: 14px; border: 1px solid #999; background: {entry.color};",
                        }
                        "{entry.label}"
                    }
                }
            }
        }
    }
}
