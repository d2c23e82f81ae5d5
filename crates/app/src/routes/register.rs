use crate::auth::use_auth;
use crate::components::{FieldError, TextField};
use crate::format_helpers::non_empty;
use crate::routes::Route;
use dioxus::prelude::*;
use shared_types::policy::landing_path;
use shared_types::{FeatureFlags, UserRole};
use std::collections::HashMap;

/// Self-registration for students and parents, when the server allows it.
#[component]
pub fn Register() -> Element {
    let mut auth = use_auth();
    let flags: FeatureFlags = use_context();
    let username = use_signal(String::new);
    let password = use_signal(String::new);
    let full_name = use_signal(String::new);
    let email = use_signal(String::new);
    let mut role = use_signal(|| UserRole::Student.as_str().to_string());
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    if !flags.self_registration {
        return rsx! {
            div { class: "auth-page",
                div { class: "card auth-card",
                    h2 { "Registration is closed" }
                    p { class: "muted", "Ask the school office to create your account." }
                    Link { to: Route::Login { redirect: None }, "Back to sign in" }
                }
            }
        };
    }

    let handle_register = move |evt: FormEvent| async move {
        evt.prevent_default();
        error_msg.set(None);

        let mut errors = HashMap::new();
        if username().trim().len() < 3 {
            errors.insert("username".to_string(), "Username must be at least 3 characters".to_string());
        }
        if password().len() < 8 {
            errors.insert("password".to_string(), "Password must be at least 8 characters".to_string());
        }
        if full_name().trim().is_empty() {
            errors.insert("full_name".to_string(), "Full name is required".to_string());
        }
        field_errors.set(errors.clone());
        if !errors.is_empty() {
            return;
        }

        loading.set(true);
        let result = server::api::register(
            username().trim().to_string(),
            password(),
            full_name().trim().to_string(),
            non_empty(&email()),
            role(),
        )
        .await;
        match result {
            Ok(user) => {
                let landing = landing_path(Some(&user.role));
                auth.set_user(user);
                navigator().push(landing);
            }
            Err(e) => {
                let err_str = e.to_string();
                let fe = shared_types::AppError::parse_field_errors(&err_str);
                if fe.is_empty() {
                    error_msg.set(Some(shared_types::AppError::friendly_message(&err_str)));
                } else {
                    field_errors.set(fe);
                }
            }
        }
        loading.set(false);
    };

    rsx! {
        div { class: "auth-page",
            div { class: "card auth-card",
                div { class: "card-header",
                    h2 { "Create an account" }
                }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }

                form { onsubmit: handle_register,
                    TextField { label: "Full name", id: "full_name", value: full_name, errors: field_errors() }
                    TextField { label: "Username", id: "username", value: username, errors: field_errors() }
                    TextField {
                        label: "Email (optional)",
                        id: "email",
                        input_type: "email",
                        value: email,
                        errors: field_errors(),
                    }
                    TextField {
                        label: "Password",
                        id: "password",
                        input_type: "password",
                        value: password,
                        errors: field_errors(),
                    }
                    div { class: "field",
                        label { r#for: "role", "I am a" }
                        select {
                            id: "role",
                            value: role(),
                            onchange: move |e: FormEvent| role.set(e.value()),
                            option { value: "student", "Student" }
                            option { value: "parent", "Parent" }
                        }
                        FieldError { errors: field_errors(), field: "role" }
                    }
                    button {
                        r#type: "submit",
                        class: "button auth-submit",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Create account" }
                    }
                }

                p { class: "auth-link",
                    "Already registered? "
                    Link { to: Route::Login { redirect: None }, "Sign in" }
                }
            }
        }
    }
}
