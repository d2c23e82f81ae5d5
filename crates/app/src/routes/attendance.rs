use chrono::{NaiveDate, Utc};
use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions};
use shared_types::policy::Action;
use shared_types::{AttendanceEntry, AttendanceRecord, AttendanceStatus, RecordAttendanceRequest, User};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::components::{EmptyState, ErrorState, LoadingState};
use crate::format_helpers::format_date;
use crate::query::{run_mutation, use_query, use_query_cache, Mutation, QueryKey};
use crate::widgets::AttendanceOverview;

#[component]
pub fn Attendance() -> Element {
    let mut course_id = use_signal(|| None::<i64>);
    let mut date = use_signal(|| Utc::now().date_naive());
    let courses = use_query(QueryKey::Courses, server::api::list_courses);

    rsx! {
        div { class: "page-header",
            h2 { "Attendance" }
            div { class: "form-inline",
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
                input {
                    r#type: "date",
                    value: "{date}",
                    onchange: move |e: FormEvent| {
                        if let Ok(d) = NaiveDate::parse_from_str(&e.value(), "%Y-%m-%d") {
                            date.set(d);
                        }
                    },
                }
            }
        }
        match course_id() {
            Some(id) => rsx! {
                AttendanceSheet { key: "{id}-{date}", course_id: id, date: date() }
                AttendanceOverview { key: "stats-{id}", course_id: id }
            },
            None => rsx! {
                EmptyState { message: "Choose a course to take attendance." }
                AttendanceOverview {}
            },
        }
    }
}

/// Status shown for a student: the unsaved choice, else the stored one, else present.
fn effective_status(
    student_id: i64,
    pending: &HashMap<i64, AttendanceStatus>,
    saved: &[AttendanceRecord],
) -> AttendanceStatus {
    pending
        .get(&student_id)
        .copied()
        .or_else(|| {
            saved
                .iter()
                .find(|r| r.student_id == student_id)
                .and_then(AttendanceRecord::status)
        })
        .unwrap_or(AttendanceStatus::Present)
}

#[component]
fn AttendanceSheet(course_id: i64, date: NaiveDate) -> Element {
    let auth = use_auth();
    let cache = use_query_cache();
    let toast = use_toast();
    let mut students = use_query(QueryKey::CourseStudents(course_id), move || {
        server::api::list_course_students(course_id)
    });
    let saved = use_query(QueryKey::CourseAttendance { course_id, date }, move || {
        server::api::course_attendance(course_id, date.format("%Y-%m-%d").to_string())
    });
    let mut pending = use_signal(HashMap::<i64, AttendanceStatus>::new);
    let mut saving = use_signal(|| false);
    let can_record = auth.can(Action::RecordAttendance);

    let roster: Vec<User> = match students.read().clone() {
        None => return rsx! { LoadingState {} },
        Some(Err(message)) => {
            return rsx! { ErrorState { message, on_retry: move |_| students.restart() } }
        }
        Some(Ok(list)) if list.is_empty() => {
            return rsx! { EmptyState { message: "No students are enrolled in this course." } }
        }
        Some(Ok(list)) => list,
    };
    let saved_records: Vec<AttendanceRecord> = match saved.read().as_ref() {
        Some(Ok(records)) => records.clone(),
        _ => Vec::new(),
    };

    let entries: Vec<AttendanceEntry> = roster
        .iter()
        .map(|s| AttendanceEntry {
            student_id: s.id,
            status: effective_status(s.id, &pending.read(), &saved_records),
            notes: None,
        })
        .collect();

    let handle_save = {
        let entries = entries.clone();
        move |_: MouseEvent| {
            let body = RecordAttendanceRequest { course_id, date, records: entries.clone() };
            spawn(async move {
                saving.set(true);
                match run_mutation(cache, Mutation::RecordAttendance { course_id }, server::api::record_attendance(body)).await {
                    Ok(records) => {
                        pending.set(HashMap::new());
                        toast.success(format!("Saved attendance for {} students", records.len()), ToastOptions::new());
                    }
                    Err(e) => toast.error(e.message, ToastOptions::new()),
                }
                saving.set(false);
            });
        }
    };

    rsx! {
        section { class: "card",
            h3 { "{format_date(date)}" }
            table { class: "table",
                thead { tr { th { "Student" } th { "Status" } } }
                tbody {
                    for (student, entry) in roster.into_iter().zip(entries.into_iter()) {
                        tr { key: "{student.id}",
                            td { "{student.full_name}" }
                            td {
                                select {
                                    disabled: !can_record,
                                    value: entry.status.as_str(),
                                    onchange: move |e: FormEvent| {
                                        if let Some(status) = AttendanceStatus::parse(&e.value()) {
                                            pending.write().insert(student.id, status);
                                        }
                                    },
                                    for status in AttendanceStatus::ALL {
                                        option { value: status.as_str(), "{status.label()}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            if can_record {
                button { class: "button", disabled: saving(), onclick: handle_save,
                    if saving() { "Saving..." } else { "Save Attendance" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: i64, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: student_id,
            course_id: 1,
            student_id,
            date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            status: status.into(),
            notes: None,
        }
    }

    #[test]
    fn unsaved_choice_wins_over_stored_status() {
        let pending = HashMap::from([(4, AttendanceStatus::Late)]);
        let saved = vec![record(4, "absent")];
        assert_eq!(effective_status(4, &pending, &saved), AttendanceStatus::Late);
    }

    #[test]
    fn stored_status_is_used_when_untouched() {
        let saved = vec![record(4, "excused")];
        assert_eq!(effective_status(4, &HashMap::new(), &saved), AttendanceStatus::Excused);
    }

    #[test]
    fn unrecorded_student_defaults_to_present() {
        assert_eq!(effective_status(9, &HashMap::new(), &[]), AttendanceStatus::Present);
    }
}
