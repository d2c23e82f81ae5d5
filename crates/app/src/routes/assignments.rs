use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions};
use shared_types::policy::Action;
use shared_types::{
    validate_submission_file, Assignment, AssignmentProgress, CreateAssignmentRequest, SubmissionFile,
    MAX_SUBMISSION_BYTES,
};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::components::{EmptyState, ErrorState, FieldError, LoadingState, TextAreaField, TextField};
use crate::format_helpers::{format_datetime, format_file_size, format_optional_date, non_empty, parse_date_input};
use crate::query::{run_mutation, use_query, use_query_cache, Mutation, MutationError, QueryKey};

#[component]
pub fn Assignments() -> Element {
    let auth = use_auth();
    if auth.can(Action::SubmitAssignment) {
        return rsx! {
            div { class: "page-header", h2 { "My Assignments" } }
            StudentAssignments {}
        };
    }
    rsx! { StaffAssignments {} }
}

#[component]
fn StaffAssignments() -> Element {
    let auth = use_auth();
    let mut course_id = use_signal(|| None::<i64>);
    let courses = use_query(QueryKey::Courses, server::api::list_courses);

    rsx! {
        div { class: "page-header",
            h2 { "Assignments" }
            select {
                value: course_id().map(|id| id.to_string()).unwrap_or_default(),
                onchange: move |e: FormEvent| course_id.set(e.value().parse().ok()),
                option { value: "", "Select a course" }
                if let Some(Ok(list)) = courses.read().as_ref() {
                    for c in list.iter() {
                        option { key: "{c.id}", value: "{c.id}", "{c.name}" }
                    }
                }
            }
        }
        match course_id() {
            None => rsx! { EmptyState { message: "Choose a course to see its assignments." } },
            Some(id) => rsx! {
                if auth.can(Action::CreateAssignment) {
                    AssignmentForm { key: "form-{id}", course_id: id }
                }
                CourseAssignments { key: "list-{id}", course_id: id }
            },
        }
    }
}

/// Assignments of one course, with submissions on demand.
#[component]
pub fn CourseAssignments(course_id: i64) -> Element {
    let auth = use_auth();
    let mut assignments = use_query(QueryKey::CourseAssignments(course_id), move || {
        server::api::list_course_assignments(course_id)
    });
    let mut open = use_signal(|| None::<i64>);
    let can_review = auth.can(Action::ViewSubmissions);

    match assignments.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| assignments.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No assignments for this course yet." }
        },
        Some(Ok(list)) => rsx! {
            ul { class: "assignment-list",
                for a in list {
                    li { key: "{a.id}",
                        AssignmentSummary { assignment: a.clone() }
                        if can_review {
                            button {
                                class: "button button-ghost",
                                onclick: move |_| {
                                    let next = if open() == Some(a.id) { None } else { Some(a.id) };
                                    open.set(next);
                                },
                                if open() == Some(a.id) { "Hide submissions" } else { "View submissions" }
                            }
                            if open() == Some(a.id) {
                                SubmissionList { assignment_id: a.id }
                            }
                        }
                    }
                }
            }
        },
    }
}

#[component]
fn AssignmentSummary(assignment: Assignment) -> Element {
    rsx! {
        div { class: "assignment-summary",
            h4 { "{assignment.title}" }
            if let Some(description) = assignment.description.as_ref() {
                p { class: "muted", "{description}" }
            }
            span { class: "muted", "Due {format_optional_date(assignment.due_date)}" }
            span { class: "badge", "{assignment.total_points} pts" }
        }
    }
}

#[component]
fn SubmissionList(assignment_id: i64) -> Element {
    let mut submissions = use_query(QueryKey::Submissions(assignment_id), move || {
        server::api::list_submissions(assignment_id)
    });

    match submissions.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| submissions.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "Nothing submitted yet." }
        },
        Some(Ok(list)) => rsx! {
            table { class: "table",
                thead {
                    tr { th { "Student" } th { "File" } th { "Size" } th { "Submitted" } th { "Comments" } }
                }
                tbody {
                    for s in list {
                        tr { key: "{s.id}",
                            td { "#{s.student_id}" }
                            td { "{s.file_name}" }
                            td { "{format_file_size(s.file_size)}" }
                            td { "{format_datetime(s.submitted_at)}" }
                            td { {s.comments.clone().unwrap_or_default()} }
                        }
                    }
                }
            }
        },
    }
}

#[component]
pub fn AssignmentForm(course_id: i64) -> Element {
    let auth = use_auth();
    let cache = use_query_cache();
    let toast = use_toast();
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut due_date = use_signal(String::new);
    let total_points = use_signal(|| "100".to_string());
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let Some(created_by) = auth.user_id() else {
            return;
        };

        let mut errors = HashMap::new();
        if title().trim().is_empty() {
            errors.insert("title".to_string(), "Assignment title is required".to_string());
        }
        let due = parse_date_input(&due_date()).unwrap_or_else(|e| {
            errors.insert("due_date".to_string(), e);
            None
        });
        let points = match total_points().trim().parse::<i32>() {
            Ok(p) if p >= 0 => p,
            _ => {
                errors.insert("total_points".to_string(), "Points must be a whole number".to_string());
                0
            }
        };
        field_errors.set(errors.clone());
        if !errors.is_empty() {
            return;
        }

        let body = CreateAssignmentRequest {
            course_id,
            title: title().trim().to_string(),
            description: non_empty(&description()),
            due_date: due,
            total_points: points,
            created_by,
        };

        saving.set(true);
        match run_mutation(cache, Mutation::CreateAssignment { course_id }, server::api::create_assignment(body)).await {
            Ok(a) => {
                title.set(String::new());
                description.set(String::new());
                due_date.set(String::new());
                toast.success(format!("Created {}", a.title), ToastOptions::new());
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
            h3 { "New assignment" }
            TextField { label: "Title", id: "title", value: title, errors: field_errors() }
            TextAreaField { label: "Description", id: "description", value: description, errors: field_errors() }
            div { class: "field-row",
                TextField { label: "Due date", id: "due_date", input_type: "date", value: due_date, errors: field_errors() }
                TextField { label: "Points", id: "total_points", input_type: "number", value: total_points, errors: field_errors() }
            }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Saving..." } else { "Create Assignment" }
            }
        }
    }
}

#[component]
fn StudentAssignments() -> Element {
    let mut assignments = use_query(QueryKey::MyAssignments, server::api::my_assignments);

    match assignments.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| assignments.restart() }
        },
        Some(Ok(items)) if items.is_empty() => rsx! {
            EmptyState { message: "You have no assignments yet." }
        },
        Some(Ok(items)) => rsx! {
            ul { class: "assignment-list",
                for item in items {
                    StudentAssignmentRow { key: "{item.assignment.id}", item }
                }
            }
        },
    }
}

#[component]
fn StudentAssignmentRow(item: AssignmentProgress) -> Element {
    let mut open = use_signal(|| false);
    let assignment_id = item.assignment.id;

    rsx! {
        li {
            AssignmentSummary { assignment: item.assignment.clone() }
            if let Some(at) = item.submitted_at {
                span { class: "badge badge-success", "Submitted {format_datetime(at)}" }
            } else {
                button {
                    class: "button",
                    onclick: move |_| open.toggle(),
                    if open() { "Cancel" } else { "Submit" }
                }
            }
            if open() && !item.submitted {
                SubmissionForm { assignment_id, on_done: move |_| open.set(false) }
            }
        }
    }
}

/// A file picked for upload, already read into memory.
#[derive(Clone, PartialEq)]
struct PickedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl PickedFile {
    fn describe(&self) -> SubmissionFile {
        SubmissionFile {
            name: self.name.clone(),
            content_type: self.content_type.clone(),
            size: self.bytes.len() as u64,
        }
    }
}

#[component]
fn SubmissionForm(assignment_id: i64, on_done: EventHandler<()>) -> Element {
    let cache = use_query_cache();
    let toast = use_toast();
    let mut picked = use_signal(|| None::<PickedFile>);
    let comments = use_signal(String::new);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);
    let upload_limit = use_resource(server::api::get_upload_limit);

    let handle_file = move |evt: FormEvent| async move {
        let files = evt.files();
        let Some(f) = files.first() else {
            picked.set(None);
            return;
        };
        let name = f.name();
        let content_type = f
            .content_type()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        match f.read_bytes().await {
            Ok(bytes) => {
                field_errors.set(HashMap::new());
                picked.set(Some(PickedFile { name, content_type, bytes: bytes.to_vec() }));
            }
            Err(_) => {
                picked.set(None);
                toast.error("Failed to read file".to_string(), ToastOptions::new());
            }
        }
    };

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let file = picked();
        let described = file.as_ref().map(PickedFile::describe);
        let max_bytes = match &*upload_limit.read() {
            Some(Ok(limit)) => *limit,
            _ => MAX_SUBMISSION_BYTES,
        };
        if let Err(e) = validate_submission_file(described.as_ref(), max_bytes) {
            field_errors.set(e.field_errors.clone());
            toast.error(e.message, ToastOptions::new());
            return;
        }
        let Some(file) = file else {
            return;
        };

        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);

        saving.set(true);
        let request = server::api::submit_assignment(
            assignment_id,
            non_empty(&comments()),
            file.name,
            file.content_type,
            encoded,
        );
        match run_mutation(cache, Mutation::SubmitAssignment { assignment_id }, request).await {
            Ok(_) => {
                toast.success("Assignment submitted".to_string(), ToastOptions::new());
                on_done.call(());
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
            div { class: "field",
                label { r#for: "file-{assignment_id}", "File" }
                input {
                    id: "file-{assignment_id}",
                    r#type: "file",
                    onchange: handle_file,
                }
                if let Some(p) = picked.read().as_ref() {
                    span { class: "muted", "{p.name} ({format_file_size(p.bytes.len() as i64)})" }
                }
                FieldError { errors: field_errors(), field: "file" }
            }
            TextAreaField { label: "Comments", id: "comments", value: comments, errors: field_errors() }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Uploading..." } else { "Submit" }
            }
        }
    }
}
