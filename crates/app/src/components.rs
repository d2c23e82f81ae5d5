//! Small building blocks shared by pages: form fields, placeholders and
//! the per-widget error state with its manual retry.

use dioxus::prelude::*;
use std::collections::HashMap;

#[component]
pub fn FieldError(errors: HashMap<String, String>, field: &'static str) -> Element {
    match errors.get(field) {
        Some(err) => rsx! { div { class: "field-error", "{err}" } },
        None => rsx! {},
    }
}

/// Labelled text-like input bound to a signal.
#[component]
pub fn TextField(
    label: &'static str,
    id: &'static str,
    value: Signal<String>,
    #[props(default = "text")] input_type: &'static str,
    #[props(default)] placeholder: &'static str,
    errors: HashMap<String, String>,
) -> Element {
    let mut value = value;
    rsx! {
        div { class: "field",
            label { r#for: id, "{label}" }
            input {
                r#type: input_type,
                id,
                placeholder,
                value: value(),
                oninput: move |e: FormEvent| value.set(e.value()),
            }
            FieldError { errors, field: id }
        }
    }
}

#[component]
pub fn TextAreaField(
    label: &'static str,
    id: &'static str,
    value: Signal<String>,
    errors: HashMap<String, String>,
) -> Element {
    let mut value = value;
    rsx! {
        div { class: "field",
            label { r#for: id, "{label}" }
            textarea {
                id,
                rows: 3,
                value: value(),
                oninput: move |e: FormEvent| value.set(e.value()),
            }
            FieldError { errors, field: id }
        }
    }
}

#[component]
pub fn LoadingState(#[props(default = "Loading...")] label: &'static str) -> Element {
    rsx! { div { class: "widget-loading", "{label}" } }
}

#[component]
pub fn EmptyState(#[props(into)] message: String) -> Element {
    rsx! { div { class: "empty-state", "{message}" } }
}

/// Inline failure for one widget. Retry refetches that widget only.
#[component]
pub fn ErrorState(message: String, on_retry: EventHandler<()>) -> Element {
    rsx! {
        div { class: "widget-error",
            span { "{message}" }
            button {
                class: "button button-ghost",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}

#[component]
pub fn StatCard(
    #[props(into)] label: String,
    #[props(into)] value: String,
    #[props(default)] hint: Option<String>,
) -> Element {
    rsx! {
        div { class: "stat-card",
            span { class: "stat-label", "{label}" }
            span { class: "stat-value", "{value}" }
            if let Some(hint) = hint {
                span { class: "stat-hint", "{hint}" }
            }
        }
    }
}

#[component]
pub fn ProgressBar(percent: i64) -> Element {
    let width = percent.clamp(0, 100);
    rsx! {
        div { class: "progress",
            div { class: "progress-fill", style: "width: {width}%" }
        }
    }
}
