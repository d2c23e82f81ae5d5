use chrono::Utc;
use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions};
use shared_types::policy::Action;
use shared_types::{CreateEventRequest, Event};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::components::{EmptyState, ErrorState, LoadingState, TextAreaField, TextField};
use crate::format_helpers::{format_datetime, non_empty, parse_datetime_input};
use crate::query::{run_mutation, use_query, use_query_cache, Mutation, MutationError, QueryKey};

#[component]
pub fn Events() -> Element {
    let auth = use_auth();
    let mut events = use_query(QueryKey::Events, server::api::list_events);
    let mut show_form = use_signal(|| false);

    let body = match events.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| events.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No events scheduled." }
        },
        Some(Ok(list)) => {
            let now = Utc::now();
            let (upcoming, past): (Vec<Event>, Vec<Event>) =
                list.into_iter().partition(|e| e.is_upcoming(now));
            rsx! {
                h3 { "Upcoming" }
                if upcoming.is_empty() {
                    EmptyState { message: "No upcoming events." }
                }
                for event in upcoming {
                    EventCard { key: "{event.id}", event }
                }
                if !past.is_empty() {
                    h3 { "Past" }
                    for event in past.into_iter().rev() {
                        EventCard { key: "{event.id}", event }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "page-header",
            h2 { "Events" }
            if auth.can(Action::CreateEvent) {
                button { class: "button", onclick: move |_| show_form.toggle(),
                    if show_form() { "Close" } else { "New Event" }
                }
            }
        }
        if show_form() {
            EventForm { on_saved: move |_| show_form.set(false) }
        }
        {body}
    }
}

#[component]
fn EventCard(event: Event) -> Element {
    rsx! {
        article { class: "card event-card",
            h4 { "{event.title}" }
            span { class: "muted",
                "{format_datetime(event.date)}"
                if let Some(end) = event.end_date {
                    " to {format_datetime(end)}"
                }
            }
            if let Some(location) = event.location.as_ref() {
                span { class: "muted", "{location}" }
            }
            if let Some(description) = event.description.as_ref() {
                p { "{description}" }
            }
        }
    }
}

#[component]
fn EventForm(on_saved: EventHandler<()>) -> Element {
    let cache = use_query_cache();
    let toast = use_toast();
    let title = use_signal(String::new);
    let description = use_signal(String::new);
    let starts = use_signal(String::new);
    let ends = use_signal(String::new);
    let location = use_signal(String::new);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let mut errors = HashMap::new();
        if title().trim().is_empty() {
            errors.insert("title".to_string(), "Title is required".to_string());
        }
        let date = match parse_datetime_input(&starts()) {
            Ok(Some(d)) => Some(d),
            Ok(None) => {
                errors.insert("date".to_string(), "Start time is required".to_string());
                None
            }
            Err(e) => {
                errors.insert("date".to_string(), e);
                None
            }
        };
        let end_date = parse_datetime_input(&ends()).unwrap_or_else(|e| {
            errors.insert("end_date".to_string(), e);
            None
        });
        let Some(date) = date.filter(|_| errors.is_empty()) else {
            field_errors.set(errors);
            return;
        };

        let body = CreateEventRequest {
            title: title().trim().to_string(),
            description: non_empty(&description()),
            date,
            end_date,
            location: non_empty(&location()),
        };
        if let Err(e) = body.check_dates() {
            field_errors.set(e.field_errors);
            return;
        }
        field_errors.set(HashMap::new());

        saving.set(true);
        match run_mutation(cache, Mutation::CreateEvent, server::api::create_event(body)).await {
            Ok(event) => {
                toast.success(format!("Scheduled {}", event.title), ToastOptions::new());
                on_saved.call(());
            }
            Err(MutationError { message, field_errors: fe }) => {
                field_errors.set(fe);
                toast.error(message, ToastOptions::new());
            }
        }
        saving.set(false);
    };

    rsx! {
        form { class: "card form-card", onsubmit: handle_submit,
            TextField { label: "Title", id: "title", value: title, errors: field_errors() }
            TextAreaField { label: "Description", id: "description", value: description, errors: field_errors() }
            div { class: "field-row",
                TextField { label: "Starts", id: "date", input_type: "datetime-local", value: starts, errors: field_errors() }
                TextField { label: "Ends", id: "end_date", input_type: "datetime-local", value: ends, errors: field_errors() }
            }
            TextField { label: "Location", id: "location", value: location, errors: field_errors() }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Saving..." } else { "Create Event" }
            }
        }
    }
}
