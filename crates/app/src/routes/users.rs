use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions};
use shared_types::policy::Action;
use shared_types::{CreateUserRequest, LinkStudentRequest, UserRole};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::components::{EmptyState, ErrorState, FieldError, LoadingState, TextField};
use crate::format_helpers::non_empty;
use crate::query::{run_mutation, use_query, use_query_cache, Mutation, MutationError, QueryKey};
use crate::routes::Route;

#[component]
pub fn Students() -> Element {
    let auth = use_auth();
    let mut show_form = use_signal(|| false);

    rsx! {
        div { class: "page-header",
            h2 { "Students" }
            if auth.can(Action::AddStudent) {
                button { class: "button", onclick: move |_| show_form.toggle(),
                    if show_form() { "Close" } else { "Add Student" }
                }
            }
        }
        if show_form() {
            AccountForm {
                roles: vec![UserRole::Student, UserRole::Parent],
                on_saved: move |_| show_form.set(false),
            }
        }
        if auth.can(Action::ManageGuardians) {
            LinkParentForm {}
        }
        UserTable { role: UserRole::Student }
    }
}

#[component]
pub fn Teachers() -> Element {
    let auth = use_auth();
    let mut show_form = use_signal(|| false);

    rsx! {
        div { class: "page-header",
            h2 { "Teachers" }
            if auth.can(Action::AddTeacher) {
                button { class: "button", onclick: move |_| show_form.toggle(),
                    if show_form() { "Close" } else { "Add Teacher" }
                }
            }
        }
        if show_form() {
            AccountForm {
                roles: vec![UserRole::Teacher],
                on_saved: move |_| show_form.set(false),
            }
        }
        UserTable { role: UserRole::Teacher }
    }
}

#[component]
fn UserTable(role: UserRole) -> Element {
    let filter = role.as_str().to_string();
    let mut users = use_query(QueryKey::Users { role: Some(filter.clone()) }, move || {
        server::api::list_users(Some(filter.clone()))
    });

    match users.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| users.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: format!("No {}s yet.", role.label().to_lowercase()) }
        },
        Some(Ok(list)) => rsx! {
            table { class: "table",
                thead {
                    tr { th { "Name" } th { "Username" } th { "Email" } th { "Status" } }
                }
                tbody {
                    for u in list {
                        tr { key: "{u.id}",
                            td {
                                if role == UserRole::Student {
                                    Link { to: Route::StudentProgressView { id: u.id }, "{u.full_name}" }
                                } else {
                                    "{u.full_name}"
                                }
                            }
                            td { "{u.username}" }
                            td { {u.email.clone().unwrap_or_default()} }
                            td {
                                if u.is_active {
                                    span { class: "badge badge-success", "Active" }
                                } else {
                                    span { class: "badge", "Disabled" }
                                }
                            }
                        }
                    }
                }
            }
        },
    }
}

/// Create an account with one of `roles`; the first is preselected.
#[component]
fn AccountForm(roles: Vec<UserRole>, on_saved: EventHandler<()>) -> Element {
    let cache = use_query_cache();
    let toast = use_toast();
    let full_name = use_signal(String::new);
    let username = use_signal(String::new);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let first = roles.first().copied().unwrap_or(UserRole::Student);
    let mut role = use_signal(|| first);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let mut errors = HashMap::new();
        if full_name().trim().is_empty() {
            errors.insert("full_name".to_string(), "Full name is required".to_string());
        }
        if username().trim().len() < 3 {
            errors.insert("username".to_string(), "Username must be at least 3 characters".to_string());
        }
        if password().len() < 8 {
            errors.insert("password".to_string(), "Password must be at least 8 characters".to_string());
        }
        field_errors.set(errors.clone());
        if !errors.is_empty() {
            return;
        }

        let body = CreateUserRequest {
            username: username().trim().to_string(),
            password: password(),
            full_name: full_name().trim().to_string(),
            email: non_empty(&email()),
            role: role().as_str().to_string(),
        };

        saving.set(true);
        match run_mutation(cache, Mutation::CreateUser, server::api::create_user(body)).await {
            Ok(user) => {
                toast.success(format!("Added {}", user.full_name), ToastOptions::new());
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
            TextField { label: "Full name", id: "full_name", value: full_name, errors: field_errors() }
            div { class: "field-row",
                TextField { label: "Username", id: "username", value: username, errors: field_errors() }
                TextField { label: "Email", id: "email", input_type: "email", value: email, errors: field_errors() }
            }
            TextField { label: "Temporary password", id: "password", input_type: "password", value: password, errors: field_errors() }
            if roles.len() > 1 {
                div { class: "field",
                    label { r#for: "role", "Account type" }
                    select {
                        id: "role",
                        value: role().as_str(),
                        onchange: move |e: FormEvent| {
                            if let Some(r) = UserRole::parse(&e.value()) {
                                role.set(r);
                            }
                        },
                        for r in roles.iter() {
                            option { value: r.as_str(), "{r.label()}" }
                        }
                    }
                }
            }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Saving..." } else { "Create Account" }
            }
        }
    }
}

#[component]
fn LinkParentForm() -> Element {
    let cache = use_query_cache();
    let toast = use_toast();
    let mut parent_id = use_signal(String::new);
    let mut student_id = use_signal(String::new);
    let relationship = use_signal(|| "parent".to_string());
    let mut is_primary = use_signal(|| false);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);

    let parents = use_query(QueryKey::Users { role: Some("parent".into()) }, move || {
        server::api::list_users(Some("parent".to_string()))
    });
    let students = use_query(QueryKey::Users { role: Some("student".into()) }, move || {
        server::api::list_users(Some("student".to_string()))
    });

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let mut errors = HashMap::new();
        let parent = parent_id().parse::<i64>().ok();
        if parent.is_none() {
            errors.insert("parent_id".to_string(), "Choose a parent".to_string());
        }
        let student = student_id().parse::<i64>().ok();
        if student.is_none() {
            errors.insert("student_id".to_string(), "Choose a student".to_string());
        }
        if relationship().trim().is_empty() {
            errors.insert("relationship".to_string(), "Relationship is required".to_string());
        }
        field_errors.set(errors.clone());
        let (Some(parent), Some(student), true) = (parent, student, errors.is_empty()) else {
            return;
        };

        let body = LinkStudentRequest {
            student_id: student,
            relationship: relationship().trim().to_string(),
            is_primary: is_primary(),
        };

        saving.set(true);
        match run_mutation(cache, Mutation::LinkStudent { parent_id: parent }, server::api::link_student(parent, body)).await {
            Ok(_) => toast.success("Parent linked".to_string(), ToastOptions::new()),
            Err(MutationError { message, field_errors: fe }) => {
                field_errors.set(fe);
                toast.error(message, ToastOptions::new());
            }
        }
        saving.set(false);
    };

    rsx! {
        form { class: "card form-card", onsubmit: handle_submit,
            h3 { "Link a parent" }
            div { class: "field-row",
                div { class: "field",
                    label { r#for: "parent_id", "Parent" }
                    select {
                        id: "parent_id",
                        value: parent_id(),
                        onchange: move |e: FormEvent| parent_id.set(e.value()),
                        option { value: "", "Select a parent" }
                        if let Some(Ok(list)) = parents.read().as_ref() {
                            for p in list.iter() {
                                option { key: "{p.id}", value: "{p.id}", "{p.full_name}" }
                            }
                        }
                    }
                    FieldError { errors: field_errors(), field: "parent_id" }
                }
                div { class: "field",
                    label { r#for: "link_student_id", "Student" }
                    select {
                        id: "link_student_id",
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
            }
            div { class: "field-row",
                TextField { label: "Relationship", id: "relationship", value: relationship, errors: field_errors() }
                label { class: "checkbox",
                    input {
                        r#type: "checkbox",
                        checked: is_primary(),
                        onchange: move |e: FormEvent| is_primary.set(e.checked()),
                    }
                    "Primary contact"
                }
            }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Linking..." } else { "Link Parent" }
            }
        }
    }
}
