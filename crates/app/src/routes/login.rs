use crate::auth::use_auth;
use crate::components::TextField;
use crate::routes::Route;
use dioxus::prelude::*;
use shared_types::policy::landing_path;
use shared_types::FeatureFlags;
use std::collections::HashMap;

/// Sign-in page. After login the user lands on their role's dashboard, or
/// on `redirect` when one was given.
#[component]
pub fn Login(redirect: Option<String>) -> Element {
    let mut auth = use_auth();
    let flags: FeatureFlags = use_context();
    let username = use_signal(String::new);
    let password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    // Store redirect in a signal so closures can read it without moving ownership
    let redirect_target = use_signal(move || redirect);

    let go_to_destination = move |role: Option<String>| {
        match redirect_target.read().clone() {
            Some(path) if path.starts_with('/') => navigator().push(path),
            _ => navigator().push(landing_path(role.as_deref())),
        };
    };

    // Already signed in: skip the form
    if let Some(role) = auth.current_user.read().as_ref().map(|u| u.role.clone()) {
        go_to_destination(Some(role));
    }

    let handle_login = move |evt: FormEvent| async move {
        evt.prevent_default();
        error_msg.set(None);

        let mut missing = HashMap::new();
        if username().trim().is_empty() {
            missing.insert("username".to_string(), "Username is required".to_string());
        }
        if password().is_empty() {
            missing.insert("password".to_string(), "Password is required".to_string());
        }
        field_errors.set(missing.clone());
        if !missing.is_empty() {
            return;
        }

        loading.set(true);
        match server::api::login(username().trim().to_string(), password()).await {
            Ok(user) => {
                let role = user.role.clone();
                auth.set_user(user);
                go_to_destination(Some(role));
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
                    h2 { "Sign In" }
                    p { class: "muted", "Islamic Studies Learning Platform" }
                }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }

                form { onsubmit: handle_login,
                    TextField {
                        label: "Username",
                        id: "username",
                        value: username,
                        errors: field_errors(),
                    }
                    TextField {
                        label: "Password",
                        id: "password",
                        input_type: "password",
                        value: password,
                        errors: field_errors(),
                    }
                    button {
                        r#type: "submit",
                        class: "button auth-submit",
                        disabled: loading(),
                        if loading() { "Signing in..." } else { "Sign In" }
                    }
                }

                if flags.self_registration {
                    p { class: "auth-link",
                        "New student or parent? "
                        Link { to: Route::Register {}, "Create an account" }
                    }
                }
            }
        }
    }
}
