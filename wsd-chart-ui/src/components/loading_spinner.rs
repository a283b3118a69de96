//! Loading indicator shown while the registry is built.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Loading watershed data...".to_string())]
    pub label: String,
}

/// Centered muted label with a CSS-only spinner.
#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    rsx! {
        div {
            style: "display: flex; gap: 10px; justify-content: center; align-items: center; padding: 40px; color: #666;",
            span {
                style: "display: inline-block; width: 16px; height: 16px; border: 2px solid #88d8b0; border-top-color: transparent; border-radius: 50%; animation: wsd-spin 0.8s linear infinite;",
            }
            style { "@keyframes wsd-spin {{ to {{ transform: rotate(360deg); }} }}" }
            "{props.label}"
        }
    }
}
