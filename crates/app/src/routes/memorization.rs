use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions};
use shared_types::policy::Action;
use shared_types::{CreateMemorizationRequest, Memorization, UpdateMemorizationRequest};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::components::{EmptyState, ErrorState, FieldError, LoadingState, ProgressBar, TextField};
use crate::format_helpers::{format_optional_date, parse_date_input};
use crate::query::{run_mutation, use_query, use_query_cache, Mutation, MutationError, QueryKey};
use crate::widgets::MemorizationOverview;

#[component]
pub fn MemorizationLog() -> Element {
    let auth = use_auth();
    let can_record = auth.can(Action::RecordMemorization);
    let mut entries = use_query(QueryKey::Memorization { student_id: None }, move || {
        server::api::list_memorization(None)
    });
    let mut show_form = use_signal(|| false);

    let body = match entries.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| entries.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No memorization entries yet." }
        },
        Some(Ok(list)) => rsx! {
            table { class: "table",
                thead {
                    tr {
                        th { "Surah" }
                        th { "Range" }
                        th { "Progress" }
                        th { "Completed on" }
                        th {}
                    }
                }
                tbody {
                    for entry in list {
                        MemorizationRow { key: "{entry.id}", entry, editable: can_record }
                    }
                }
            }
        },
    };

    rsx! {
        div { class: "page-header",
            h2 { "Memorization" }
            if can_record {
                button { class: "button", onclick: move |_| show_form.toggle(),
                    if show_form() { "Close" } else { "Record Memorization" }
                }
            }
        }
        MemorizationOverview {}
        if show_form() {
            MemorizationForm { on_saved: move |_| show_form.set(false) }
        }
        {body}
    }
}

#[component]
fn MemorizationRow(entry: Memorization, editable: bool) -> Element {
    let cache = use_query_cache();
    let toast = use_toast();
    let mut editing = use_signal(|| false);
    let mut progress = use_signal(|| entry.progress_percent().to_string());
    let mut saving = use_signal(|| false);
    let id = entry.id;

    let save = move |mark_complete: bool| async move {
        let Ok(value) = progress().trim().parse::<i32>() else {
            toast.error("Progress must be a number".to_string(), ToastOptions::new());
            return;
        };
        let body = UpdateMemorizationRequest {
            progress: Some(if mark_complete { 100 } else { value }),
            is_completed: mark_complete.then_some(true),
            ..Default::default()
        };
        saving.set(true);
        match run_mutation(cache, Mutation::RecordMemorization, server::api::update_memorization(id, body)).await {
            Ok(updated) => {
                progress.set(updated.progress_percent().to_string());
                editing.set(false);
                toast.success(format!("{} updated", updated.surah), ToastOptions::new());
            }
            Err(e) => toast.error(e.message, ToastOptions::new()),
        }
        saving.set(false);
    };

    rsx! {
        tr {
            td { "{entry.surah}" }
            td { "{entry.ayah_range()}" }
            td {
                if editing() {
                    input {
                        r#type: "number",
                        min: "0",
                        max: "100",
                        value: progress(),
                        oninput: move |e: FormEvent| progress.set(e.value()),
                    }
                } else {
                    ProgressBar { percent: entry.progress_percent() as i64 }
                    span { class: "muted", "{entry.progress_label()}" }
                }
                if let Some(tag) = entry.completion_tag() {
                    span { class: "badge badge-success", "{tag}" }
                }
            }
            td { "{format_optional_date(entry.completion_date)}" }
            td {
                if editable && editing() {
                    button { class: "button", disabled: saving(), onclick: move |_| save(false), "Save" }
                    button { class: "button button-ghost", onclick: move |_| editing.set(false), "Cancel" }
                } else if editable && entry.completion_tag().is_none() {
                    button { class: "button button-ghost", onclick: move |_| editing.set(true), "Update" }
                    button { class: "button button-ghost", disabled: saving(), onclick: move |_| save(true), "Mark complete" }
                }
            }
        }
    }
}

#[component]
fn MemorizationForm(on_saved: EventHandler<()>) -> Element {
    let cache = use_query_cache();
    let toast = use_toast();
    let mut student_id = use_signal(String::new);
    let mut course_id = use_signal(String::new);
    let surah = use_signal(String::new);
    let ayah_start = use_signal(|| "1".to_string());
    let ayah_end = use_signal(|| "1".to_string());
    let progress = use_signal(|| "0".to_string());
    let completion_date = use_signal(String::new);
    let mut is_completed = use_signal(|| false);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);

    let students = use_query(QueryKey::Users { role: Some("student".into()) }, move || {
        server::api::list_users(Some("student".to_string()))
    });
    let courses = use_query(QueryKey::Courses, server::api::list_courses);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let mut errors = HashMap::new();
        let mut number = |field: &str, raw: String, message: &str| {
            raw.trim().parse::<i32>().unwrap_or_else(|_| {
                errors.insert(field.to_string(), message.to_string());
                0
            })
        };
        let start = number("ayah_start", ayah_start(), "Starting ayah must be a number");
        let end = number("ayah_end", ayah_end(), "Ending ayah must be a number");
        let pct = number("progress", progress(), "Progress must be a number");

        let student = student_id().parse::<i64>().ok();
        if student.is_none() {
            errors.insert("student_id".to_string(), "Choose a student".to_string());
        }
        let course = course_id().parse::<i64>().ok();
        if course.is_none() {
            errors.insert("course_id".to_string(), "Choose a course".to_string());
        }
        if surah().trim().is_empty() {
            errors.insert("surah".to_string(), "Surah is required".to_string());
        }
        let completed_on = parse_date_input(&completion_date()).unwrap_or_else(|e| {
            errors.insert("completion_date".to_string(), e);
            None
        });

        let body = CreateMemorizationRequest {
            student_id: student.unwrap_or_default(),
            course_id: course.unwrap_or_default(),
            surah: surah().trim().to_string(),
            ayah_start: start,
            ayah_end: end,
            completion_date: completed_on,
            progress: pct,
            is_completed: is_completed(),
        };
        if errors.is_empty() {
            if let Err(e) = body.check_ayahs() {
                errors.extend(e.field_errors);
            }
        }
        field_errors.set(errors.clone());
        if !errors.is_empty() {
            return;
        }

        saving.set(true);
        match run_mutation(cache, Mutation::RecordMemorization, server::api::record_memorization(body)).await {
            Ok(entry) => {
                toast.success(format!("Recorded {}", entry.surah), ToastOptions::new());
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
            div { class: "field-row",
                div { class: "field",
                    label { r#for: "student_id", "Student" }
                    select {
                        id: "student_id",
                        value: student_id(),
                        onchange: move |e: FormEvent| student_id.set(e.value()),
                        option { value: "", "Select a student" }
                        if let Some(Ok(list)) = students.read().as_ref() {
                            for s in list.iter() {
                                option { key: "{s.id}", value: "{s.id}", "{s.full_name}" }
                            }
                        }
                    }
                    FieldError { errors: field_errors(), field: "student_id" }
                }
                div { class: "field",
                    label { r#for: "course_id", "Course" }
                    select {
                        id: "course_id",
                        value: course_id(),
                        onchange: move |e: FormEvent| course_id.set(e.value()),
                        option { value: "", "Select a course" }
                        if let Some(Ok(list)) = courses.read().as_ref() {
                            for c in list.iter() {
                                option { key: "{c.id}", value: "{c.id}", "{c.name}" }
                            }
                        }
                    }
                    FieldError { errors: field_errors(), field: "course_id" }
                }
            }
            TextField { label: "Surah", id: "surah", value: surah, errors: field_errors() }
            div { class: "field-row",
                TextField { label: "From ayah", id: "ayah_start", input_type: "number", value: ayah_start, errors: field_errors() }
                TextField { label: "To ayah", id: "ayah_end", input_type: "number", value: ayah_end, errors: field_errors() }
                TextField { label: "Progress (%)", id: "progress", input_type: "number", value: progress, errors: field_errors() }
            }
            div { class: "field-row",
                TextField { label: "Completed on", id: "completion_date", input_type: "date", value: completion_date, errors: field_errors() }
                label { class: "checkbox",
                    input {
                        r#type: "checkbox",
                        checked: is_completed(),
                        onchange: move |e: FormEvent| is_completed.set(e.checked()),
                    }
                    "Completed"
                }
            }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Saving..." } else { "Record" }
            }
        }
    }
}
