use crate::auth::{sign_out, use_auth};
use crate::query::use_query_cache;
use dioxus::prelude::*;

#[component]
pub fn ProfileSection() -> Element {
    let auth = use_auth();
    let cache = use_query_cache();
    let mut signing_out = use_signal(|| false);

    let Some(user) = auth.current_user.read().clone() else {
        return rsx! {};
    };
    let role_label = user.role().map(|r| r.label()).unwrap_or("Unknown role");

    rsx! {
        section { class: "card settings-section",
            h3 { "Profile" }
            div { class: "settings-avatar-section",
                div { class: "avatar", "{user.initials()}" }
                div {
                    p { class: "settings-name", "{user.full_name}" }
                    p { class: "muted", "@{user.username}" }
                    span { class: "badge", "{role_label}" }
                }
            }
            if let Some(email) = user.email.as_ref() {
                p { "Email: {email}" }
            }
            button {
                class: "button button-ghost",
                disabled: signing_out(),
                onclick: move |_| async move {
                    signing_out.set(true);
                    sign_out(auth, cache).await;
                },
                if signing_out() { "Signing out..." } else { "Sign out" }
            }
        }
    }
}
