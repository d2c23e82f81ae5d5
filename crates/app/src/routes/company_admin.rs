use dioxus::prelude::*;
use shared_types::policy::policy_for;
use shared_types::UserRole;

use crate::widgets::UpcomingEvents;

/// Company admins are view-only: no create actions, no school records.
#[component]
pub fn CompanyAdminDashboard() -> Element {
    rsx! {
        div { class: "page-header",
            h2 { "Company administration" }
            p { class: "muted", "Enterprise tools for platform operators." }
        }
        div { class: "widget-grid",
            section { class: "widget",
                h3 { class: "widget-title", "Enterprise tools" }
                Link { to: super::Route::QualityAssurance {}, class: "button", "Open QA" }
            }
            UpcomingEvents {}
        }
    }
}

/// Access matrix for review: landing page, navigation and permitted
/// actions of every role.
#[component]
pub fn QualityAssurance() -> Element {
    rsx! {
        div { class: "page-header",
            h2 { "Role access matrix" }
        }
        table { class: "table",
            thead {
                tr {
                    th { "Role" }
                    th { "Landing page" }
                    th { "Navigation" }
                    th { "Actions" }
                }
            }
            tbody {
                for role in UserRole::ALL {
                    RoleRow { key: "{role}", role }
                }
            }
        }
    }
}

#[component]
fn RoleRow(role: UserRole) -> Element {
    let policy = policy_for(role);
    let nav = policy
        .nav_items()
        .map(|i| i.label)
        .collect::<Vec<_>>()
        .join(", ");
    let actions = if policy.actions.is_empty() {
        "View only".to_string()
    } else {
        policy
            .actions
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    rsx! {
        tr {
            td { "{role.label()}" }
            td { code { "{policy.landing_path}" } }
            td { "{nav}" }
            td { "{actions}" }
        }
    }
}
