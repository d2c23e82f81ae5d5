//! Dashboard widgets. Each one fetches its own collections, computes its
//! figures and renders its own loading and error states; a failed widget
//! never blocks its neighbours.

use chrono::Utc;
use dioxus::prelude::*;
use shared_types::policy::{Action, RolePolicy};
use shared_types::{AttendanceStats, Event, MemorizationStats};

use crate::components::{EmptyState, ErrorState, LoadingState, ProgressBar, StatCard};
use crate::format_helpers::{format_datetime, format_optional_date};
use crate::query::{use_query, QueryKey};
use crate::routes::Route;

/// Page a quick-action button opens.
pub fn action_route(action: Action) -> Option<Route> {
    match action {
        Action::AddStudent => Some(Route::Students {}),
        Action::AddTeacher => Some(Route::Teachers {}),
        Action::CreateCourse => Some(Route::CourseList {}),
        Action::CreateAssignment | Action::SubmitAssignment => Some(Route::Assignments {}),
        Action::RecordAttendance => Some(Route::Attendance {}),
        _ => None,
    }
}

#[component]
pub fn QuickActions(policy: &'static RolePolicy) -> Element {
    if policy.is_view_only() {
        return rsx! {};
    }
    rsx! {
        div { class: "quick-actions",
            for action in policy.create_actions() {
                if let Some(to) = action_route(action) {
                    Link { to, class: "button", "{action.label()}" }
                }
            }
        }
    }
}

/// Present share, absent share and the weakest classes.
#[component]
pub fn AttendanceOverview(
    #[props(default)] course_id: Option<i64>,
    #[props(default)] student_id: Option<i64>,
) -> Element {
    let mut stats = use_query(QueryKey::AttendanceStats { course_id, student_id }, move || {
        server::api::attendance_stats(course_id, student_id)
    });

    let body = match stats.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| stats.restart() }
        },
        Some(Ok(s)) => rsx! { AttendanceFigures { stats: s } },
    };

    rsx! {
        section { class: "widget",
            h3 { class: "widget-title", "Attendance" }
            {body}
        }
    }
}

#[component]
fn AttendanceFigures(stats: AttendanceStats) -> Element {
    if !stats.has_records() {
        return rsx! { EmptyState { message: "No attendance has been recorded yet." } };
    }
    rsx! {
        div { class: "stat-row",
            StatCard {
                label: "Present",
                value: format!("{}%", stats.present_percentage),
                hint: format!("{} present", stats.present_count),
            }
            StatCard {
                label: "Absent",
                value: format!("{}%", stats.absent_percentage()),
                hint: format!("{} absent", stats.absent_count),
            }
            StatCard { label: "Late", value: stats.late_count.to_string() }
            StatCard { label: "Excused", value: stats.excused_count.to_string() }
        }
        ProgressBar { percent: stats.present_percentage }
        if !stats.low_attendance_classes.is_empty() {
            div { class: "low-attendance",
                h4 { "Low attendance" }
                ul {
                    for class in stats.low_attendance_classes.iter() {
                        li { key: "{class.course_id}",
                            Link { to: Route::CourseDetail { id: class.course_id }, "{class.course_name}" }
                            span { class: "badge badge-warning", "{class.present_percentage}%" }
                        }
                    }
                }
            }
        }
    }
}

/// Completed passages and average progress.
#[component]
pub fn MemorizationOverview(#[props(default)] student_id: Option<i64>) -> Element {
    let mut stats = use_query(QueryKey::MemorizationStats { student_id }, move || {
        server::api::memorization_stats(student_id)
    });

    let body = match stats.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| stats.restart() }
        },
        Some(Ok(s)) => rsx! { MemorizationFigures { stats: s } },
    };

    rsx! {
        section { class: "widget",
            h3 { class: "widget-title", "Memorization" }
            {body}
        }
    }
}

#[component]
fn MemorizationFigures(stats: MemorizationStats) -> Element {
    if stats.total_count == 0 {
        return rsx! { EmptyState { message: "No memorization entries yet." } };
    }
    rsx! {
        div { class: "stat-row",
            StatCard {
                label: "Completed",
                value: format!("{} / {}", stats.completed_count, stats.total_count),
            }
            StatCard { label: "Average progress", value: format!("{}%", stats.average_progress) }
        }
        ProgressBar { percent: stats.average_progress }
    }
}

/// Events that have not ended yet, soonest first.
#[component]
pub fn UpcomingEvents(#[props(default = 5)] limit: usize) -> Element {
    let mut events = use_query(QueryKey::Events, server::api::list_events);

    let body = match events.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| events.restart() }
        },
        Some(Ok(all)) => {
            let now = Utc::now();
            let upcoming: Vec<Event> = all.into_iter().filter(|e| e.is_upcoming(now)).take(limit).collect();
            if upcoming.is_empty() {
                rsx! { EmptyState { message: "No upcoming events." } }
            } else {
                rsx! {
                    ul { class: "event-list",
                        for event in upcoming {
                            li { key: "{event.id}",
                                span { class: "event-title", "{event.title}" }
                                span { class: "muted", "{format_datetime(event.date)}" }
                                if let Some(location) = event.location.as_ref() {
                                    span { class: "muted", "{location}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        section { class: "widget",
            h3 { class: "widget-title", "Upcoming events" }
            {body}
        }
    }
}

/// The signed-in student's outstanding and submitted work.
#[component]
pub fn MyAssignmentsWidget() -> Element {
    let mut assignments = use_query(QueryKey::MyAssignments, server::api::my_assignments);

    let body = match assignments.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| assignments.restart() }
        },
        Some(Ok(items)) if items.is_empty() => rsx! {
            EmptyState { message: "No assignments yet." }
        },
        Some(Ok(items)) => {
            let submitted = items.iter().filter(|a| a.submitted).count();
            rsx! {
                p { class: "muted", "{submitted} of {items.len()} submitted" }
                ul { class: "assignment-list",
                    for item in items {
                        li { key: "{item.assignment.id}",
                            span { "{item.assignment.title}" }
                            span { class: "muted", "{format_optional_date(item.assignment.due_date)}" }
                            if item.submitted {
                                span { class: "badge badge-success", "Submitted" }
                            } else {
                                span { class: "badge", "Pending" }
                            }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        section { class: "widget",
            h3 { class: "widget-title", "My assignments" }
            {body}
        }
    }
}

/// Headline figures for one child, as shown on the parent dashboard.
#[component]
pub fn ProgressSummaryWidget(student_id: i64) -> Element {
    let mut progress = use_query(QueryKey::StudentProgress(student_id), move || {
        server::api::student_progress(student_id)
    });

    let body = match progress.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| progress.restart() }
        },
        Some(Ok(p)) => {
            let s = p.summary;
            rsx! {
                div { class: "stat-row",
                    StatCard { label: "Attendance", value: format!("{}%", s.attendance_percentage) }
                    StatCard {
                        label: "Memorization",
                        value: format!("{} / {}", s.memorization_completed, s.memorization_total),
                        hint: "passages completed".to_string(),
                    }
                    StatCard {
                        label: "Assignments",
                        value: format!("{} / {}", s.assignments_submitted, s.assignments_total),
                        hint: "submitted".to_string(),
                    }
                }
                Link { to: Route::StudentProgressView { id: student_id }, class: "button button-ghost", "View details" }
            }
        }
    };

    rsx! {
        section { class: "widget",
            {body}
        }
    }
}
