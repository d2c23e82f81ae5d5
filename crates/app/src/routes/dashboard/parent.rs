use dioxus::prelude::*;

use super::Greeting;
use crate::auth::use_auth;
use crate::components::{EmptyState, ErrorState, LoadingState, ProgressBar, StatCard};
use crate::format_helpers::{format_datetime, format_optional_date};
use crate::query::{use_query, QueryKey};
use crate::widgets::{ProgressSummaryWidget, UpcomingEvents};

/// One summary card per linked child.
#[component]
pub fn ParentDashboard() -> Element {
    let auth = use_auth();
    let Some(parent_id) = auth.user_id() else {
        return rsx! {};
    };

    rsx! {
        Greeting { subtitle: "Your children's progress" }
        LinkedChildren { key: "{parent_id}", parent_id }
        div { class: "widget-grid",
            UpcomingEvents {}
        }
    }
}

#[component]
fn LinkedChildren(parent_id: i64) -> Element {
    let mut children = use_query(QueryKey::LinkedStudents(parent_id), move || {
        server::api::list_linked_students(parent_id)
    });

    match children.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| children.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No students are linked to your account yet." }
        },
        Some(Ok(list)) => rsx! {
            div { class: "widget-grid",
                for child in list {
                    div { key: "{child.id}", class: "child-card",
                        h3 { "{child.full_name}" }
                        ProgressSummaryWidget { student_id: child.id }
                    }
                }
            }
        },
    }
}

/// Full progress report for one student.
#[component]
pub fn StudentProgressView(id: i64) -> Element {
    rsx! { ProgressReport { key: "{id}", student_id: id } }
}

#[component]
fn ProgressReport(student_id: i64) -> Element {
    let mut progress = use_query(QueryKey::StudentProgress(student_id), move || {
        server::api::student_progress(student_id)
    });

    let report = match progress.read().clone() {
        None => return rsx! { LoadingState {} },
        Some(Err(message)) => {
            return rsx! {
                ErrorState { message, on_retry: move |_| progress.restart() }
            }
        }
        Some(Ok(p)) => p,
    };
    let s = &report.summary;

    rsx! {
        div { class: "page-header",
            h2 { "{report.student.full_name}" }
            p { class: "muted", "@{report.student.username}" }
        }

        div { class: "stat-row",
            StatCard { label: "Attendance", value: format!("{}%", s.attendance_percentage) }
            StatCard {
                label: "Memorization",
                value: format!("{} / {}", s.memorization_completed, s.memorization_total),
            }
            StatCard {
                label: "Assignments",
                value: format!("{} / {}", s.assignments_submitted, s.assignments_total),
            }
        }

        section { class: "widget",
            h3 { class: "widget-title", "Courses" }
            if report.courses.is_empty() {
                EmptyState { message: "Not enrolled in any course." }
            }
            ul { class: "course-list",
                for course in report.courses.iter() {
                    li { key: "{course.id}", "{course.name}" }
                }
            }
        }

        section { class: "widget",
            h3 { class: "widget-title", "Memorization" }
            if report.memorization.is_empty() {
                EmptyState { message: "No memorization entries yet." }
            }
            for entry in report.memorization.iter() {
                div { key: "{entry.id}", class: "memorization-row",
                    span { "{entry.surah} ({entry.ayah_range()})" }
                    ProgressBar { percent: entry.progress_percent() as i64 }
                    span { class: "muted", "{entry.progress_label()}" }
                    if let Some(tag) = entry.completion_tag() {
                        span { class: "badge badge-success", "{tag}" }
                    }
                }
            }
        }

        section { class: "widget",
            h3 { class: "widget-title", "Assignments" }
            if report.assignments.is_empty() {
                EmptyState { message: "No assignments yet." }
            }
            ul { class: "assignment-list",
                for item in report.assignments.iter() {
                    li { key: "{item.assignment.id}",
                        span { "{item.assignment.title}" }
                        span { class: "muted", "{format_optional_date(item.assignment.due_date)}" }
                        match item.submitted_at {
                            Some(at) => rsx! { span { class: "badge badge-success", "Submitted {format_datetime(at)}" } },
                            None => rsx! { span { class: "badge", "Pending" } },
                        }
                    }
                }
            }
        }
    }
}
