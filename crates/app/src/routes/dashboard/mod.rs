//! Role dashboards: each is a grid of independent widgets.

mod director;
mod parent;
mod student;
mod teacher;

pub use director::DirectorDashboard;
pub use parent::{ParentDashboard, StudentProgressView};
pub use student::StudentDashboard;
pub use teacher::TeacherDashboard;

use dioxus::prelude::*;

use crate::auth::use_auth;

#[component]
fn Greeting(subtitle: &'static str) -> Element {
    let auth = use_auth();
    let name = auth
        .current_user
        .read()
        .as_ref()
        .map(|u| u.full_name.clone())
        .unwrap_or_default();
    rsx! {
        div { class: "page-header",
            h2 { "Welcome back, {name}" }
            p { class: "muted", "{subtitle}" }
        }
    }
}
