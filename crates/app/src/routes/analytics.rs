use dioxus::prelude::*;

use crate::query::{use_query, QueryKey};
use crate::widgets::{AttendanceOverview, MemorizationOverview};

/// School-wide attendance and memorization, optionally narrowed to one course.
#[component]
pub fn Analytics() -> Element {
    let mut course_id = use_signal(|| None::<i64>);
    let courses = use_query(QueryKey::Courses, server::api::list_courses);

    rsx! {
        div { class: "page-header",
            h2 { "Analytics" }
            select {
                value: course_id().map(|id| id.to_string()).unwrap_or_default(),
                onchange: move |e: FormEvent| course_id.set(e.value().parse().ok()),
                option { value: "", "All courses" }
                if let Some(Ok(list)) = courses.read().as_ref() {
                    for c in list.iter() {
                        option { key: "{c.id}", value: "{c.id}", "{c.name}" }
                    }
                }
            }
        }
        div { class: "dashboard-grid",
            if let Some(id) = course_id() {
                AttendanceOverview { key: "{id}", course_id: id }
            } else {
                AttendanceOverview {}
            }
            MemorizationOverview {}
        }
    }
}
