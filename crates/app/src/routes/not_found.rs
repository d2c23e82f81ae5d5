use dioxus::prelude::*;
use shared_types::policy::landing_path;

use crate::auth::use_auth;

/// 404 Not Found page.
#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let auth = use_auth();
    let path = format!("/{}", route.join("/"));
    let home = landing_path(auth.current_user.read().as_ref().map(|u| u.role.as_str()));

    rsx! {
        div { class: "not-found-page",
            div { class: "card not-found-card",
                div { class: "not-found-code", "404" }
                h1 { class: "not-found-title", "Page Not Found" }
                p { class: "not-found-message",
                    "The page "
                    code { "{path}" }
                    " could not be found."
                }
                Link { to: home, class: "button", "Back to Dashboard" }
            }
        }
    }
}
