//! Reusable Dioxus RSX components for the watershed dashboard.

mod chart_container;
mod chart_header;
mod download_button;
mod error_display;
mod loading_spinner;
mod map_legend;
mod placeholder_message;
mod selectors;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use download_button::DownloadButton;
pub use error_display::{ErrorDisplay, LoadWarnings};
pub use loading_spinner::LoadingSpinner;
pub use map_legend::MapLegend;
pub use placeholder_message::PlaceholderMessage;
pub use selectors::{ColorFieldSelector, WatershedSelector, YearSelector};
