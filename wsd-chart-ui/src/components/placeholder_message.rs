use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct PlaceholderMessageProps {
    pub message: String,
}

/// Muted notice shown where a view has nothing to draw.
#[component]
pub fn PlaceholderMessage(props: PlaceholderMessageProps) -> Element {
    rsx! {
        div {
            style: "padding: 24px 16px; color: #666; font-size: 15px; font-weight: bold;",
            "{props.message}"
        }
    }
}
