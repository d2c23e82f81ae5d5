use dioxus::prelude::*;
use shared_types::policy::policy_for;
use shared_types::UserRole;

use super::Greeting;
use crate::components::{EmptyState, ErrorState, LoadingState};
use crate::query::{use_query, QueryKey};
use crate::routes::Route;
use crate::widgets::{AttendanceOverview, MemorizationOverview, QuickActions, UpcomingEvents};

#[component]
pub fn TeacherDashboard() -> Element {
    rsx! {
        Greeting { subtitle: "Your classes at a glance" }
        QuickActions { policy: policy_for(UserRole::Teacher) }
        div { class: "widget-grid",
            MyClasses {}
            AttendanceOverview {}
            MemorizationOverview {}
            UpcomingEvents {}
        }
    }
}

#[component]
fn MyClasses() -> Element {
    let mut courses = use_query(QueryKey::Courses, server::api::list_courses);

    let body = match courses.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| courses.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No courses yet." }
        },
        Some(Ok(list)) => rsx! {
            ul { class: "course-list",
                for course in list {
                    li { key: "{course.id}",
                        Link { to: Route::CourseDetail { id: course.id }, "{course.name}" }
                    }
                }
            }
        },
    };

    rsx! {
        section { class: "widget",
            h3 { class: "widget-title", "Courses" }
            {body}
        }
    }
}
