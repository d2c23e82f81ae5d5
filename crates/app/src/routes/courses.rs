use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions};
use shared_types::policy::Action;
use shared_types::{Course, CreateCourseRequest, CreateLessonRequest, EnrollRequest, UserRole};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::components::{EmptyState, ErrorState, FieldError, LoadingState, TextAreaField, TextField};
use crate::format_helpers::{format_optional_date, non_empty, parse_date_input};
use crate::query::{run_mutation, use_query, use_query_cache, Mutation, MutationError, QueryKey};
use crate::routes::assignments::{AssignmentForm, CourseAssignments};
use crate::routes::Route;

#[component]
pub fn CourseList() -> Element {
    let auth = use_auth();
    let mut courses = use_query(QueryKey::Courses, server::api::list_courses);
    let mut show_form = use_signal(|| false);

    let body = match courses.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| courses.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No courses yet." }
        },
        Some(Ok(list)) => rsx! {
            div { class: "card-grid",
                for course in list {
                    CourseCard { key: "{course.id}", course }
                }
            }
        },
    };

    rsx! {
        div { class: "page-header",
            h2 { "Courses" }
            if auth.can(Action::CreateCourse) {
                button {
                    class: "button",
                    onclick: move |_| show_form.toggle(),
                    if show_form() { "Close" } else { "New Course" }
                }
            }
        }
        if show_form() {
            CourseForm { on_saved: move |_| show_form.set(false) }
        }
        {body}
    }
}

#[component]
fn CourseCard(course: Course) -> Element {
    rsx! {
        Link { to: Route::CourseDetail { id: course.id }, class: "card course-card",
            h3 { "{course.name}" }
            if let Some(description) = course.description.as_ref() {
                p { class: "muted", "{description}" }
            }
            span { class: "muted",
                "{format_optional_date(course.start_date)} to {format_optional_date(course.end_date)}"
            }
        }
    }
}

#[component]
fn CourseForm(on_saved: EventHandler<()>) -> Element {
    let auth = use_auth();
    let cache = use_query_cache();
    let toast = use_toast();
    let name = use_signal(String::new);
    let description = use_signal(String::new);
    let start_date = use_signal(String::new);
    let end_date = use_signal(String::new);
    let mut teacher_id = use_signal(String::new);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);

    let is_director = auth.role() == Some(UserRole::Director);
    let teachers = use_query(QueryKey::Users { role: Some("teacher".into()) }, move || {
        server::api::list_users(Some("teacher".to_string()))
    });

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();

        let mut errors = HashMap::new();
        if name().trim().is_empty() {
            errors.insert("name".to_string(), "Course name is required".to_string());
        }
        let start = parse_date_input(&start_date()).unwrap_or_else(|e| {
            errors.insert("start_date".to_string(), e);
            None
        });
        let end = parse_date_input(&end_date()).unwrap_or_else(|e| {
            errors.insert("end_date".to_string(), e);
            None
        });
        let teacher = teacher_id().parse::<i64>().ok();
        if is_director && teacher.is_none() {
            errors.insert("teacher_id".to_string(), "Choose a teacher".to_string());
        }

        let body = CreateCourseRequest {
            name: name().trim().to_string(),
            description: non_empty(&description()),
            start_date: start,
            end_date: end,
            teacher_id: teacher,
        };
        if let Err(e) = body.check_dates() {
            errors.extend(e.field_errors);
        }
        field_errors.set(errors.clone());
        if !errors.is_empty() {
            return;
        }

        saving.set(true);
        match run_mutation(cache, Mutation::CreateCourse, server::api::create_course(body)).await {
            Ok(course) => {
                toast.success(format!("Created {}", course.name), ToastOptions::new());
                on_saved.call(());
            }
            Err(MutationError { message, field_errors: fe }) => {
                field_errors.set(fe);
                toast.error(message, ToastOptions::new());
            }
        }
        saving.set(false);
    };

    rsx! {
        form { class: "card form-card", onsubmit: handle_submit,
            TextField { label: "Name", id: "name", value: name, errors: field_errors() }
            TextAreaField { label: "Description", id: "description", value: description, errors: field_errors() }
            div { class: "field-row",
                TextField { label: "Start date", id: "start_date", input_type: "date", value: start_date, errors: field_errors() }
                TextField { label: "End date", id: "end_date", input_type: "date", value: end_date, errors: field_errors() }
            }
            if is_director {
                div { class: "field",
                    label { r#for: "teacher_id", "Teacher" }
                    select {
                        id: "teacher_id",
                        value: teacher_id(),
                        onchange: move |e: FormEvent| teacher_id.set(e.value()),
                        option { value: "", "Select a teacher" }
                        if let Some(Ok(list)) = teachers.read().as_ref() {
                            for t in list.iter() {
                                option { key: "{t.id}", value: "{t.id}", "{t.full_name}" }
                            }
                        }
                    }
                    FieldError { errors: field_errors(), field: "teacher_id" }
                }
            }
            button {
                r#type: "submit",
                class: "button",
                disabled: saving(),
                if saving() { "Saving..." } else { "Create Course" }
            }
        }
    }
}

#[component]
pub fn CourseDetail(id: i64) -> Element {
    rsx! { CourseDetailBody { key: "{id}", course_id: id } }
}

#[derive(Clone, Copy, PartialEq)]
enum CourseTab {
    Assignments,
    Lessons,
    Students,
}

#[component]
fn CourseDetailBody(course_id: i64) -> Element {
    let auth = use_auth();
    let mut course = use_query(QueryKey::Course(course_id), move || server::api::get_course(course_id));
    let mut tab = use_signal(|| CourseTab::Assignments);
    let is_staff = auth.role().is_some_and(|r| r.is_staff());

    let header = match course.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| course.restart() }
        },
        Some(Ok(c)) => rsx! {
            div { class: "page-header",
                h2 { "{c.name}" }
                if let Some(description) = c.description.as_ref() {
                    p { class: "muted", "{description}" }
                }
            }
        },
    };

    rsx! {
        {header}
        div { class: "tabs",
            button {
                class: if tab() == CourseTab::Assignments { "tab active" } else { "tab" },
                onclick: move |_| tab.set(CourseTab::Assignments),
                "Assignments"
            }
            button {
                class: if tab() == CourseTab::Lessons { "tab active" } else { "tab" },
                onclick: move |_| tab.set(CourseTab::Lessons),
                "Lessons"
            }
            if is_staff {
                button {
                    class: if tab() == CourseTab::Students { "tab active" } else { "tab" },
                    onclick: move |_| tab.set(CourseTab::Students),
                    "Students"
                }
            }
        }
        match tab() {
            CourseTab::Assignments => rsx! {
                if auth.can(Action::CreateAssignment) {
                    AssignmentForm { course_id }
                }
                CourseAssignments { course_id }
            },
            CourseTab::Lessons => rsx! { Lessons { course_id } },
            CourseTab::Students => rsx! { CourseStudents { course_id } },
        }
    }
}

#[component]
fn Lessons(course_id: i64) -> Element {
    let auth = use_auth();
    let mut lessons = use_query(QueryKey::Lessons(course_id), move || server::api::list_lessons(course_id));

    let body = match lessons.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| lessons.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No lessons yet." }
        },
        Some(Ok(list)) => rsx! {
            ol { class: "lesson-list",
                for lesson in list {
                    li { key: "{lesson.id}",
                        h4 { "{lesson.title}" }
                        if let Some(description) = lesson.description.as_ref() {
                            p { class: "muted", "{description}" }
                        }
                        if let Some(content) = lesson.content.as_ref() {
                            p { "{content}" }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        if auth.can(Action::CreateCourse) {
            LessonForm { course_id }
        }
        {body}
    }
}

#[component]
fn LessonForm(course_id: i64) -> Element {
    let cache = use_query_cache();
    let toast = use_toast();
    let mut title = use_signal(String::new);
    let description = use_signal(String::new);
    let mut content = use_signal(String::new);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut saving = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        if title().trim().is_empty() {
            field_errors.set(HashMap::from([("title".to_string(), "Lesson title is required".to_string())]));
            return;
        }
        field_errors.set(HashMap::new());

        let body = CreateLessonRequest {
            course_id,
            title: title().trim().to_string(),
            description: non_empty(&description()),
            content: non_empty(&content()),
            order_index: None,
        };

        saving.set(true);
        match run_mutation(cache, Mutation::CreateLesson { course_id }, server::api::create_lesson(body)).await {
            Ok(_) => {
                title.set(String::new());
                content.set(String::new());
                toast.success("Lesson added".to_string(), ToastOptions::new());
            }
            Err(MutationError { message, field_errors: fe }) => {
                field_errors.set(fe);
                toast.error(message, ToastOptions::new());
            }
        }
        saving.set(false);
    };

    rsx! {
        form { class: "card form-card", onsubmit: handle_submit,
            TextField { label: "Lesson title", id: "title", value: title, errors: field_errors() }
            TextField { label: "Summary", id: "description", value: description, errors: field_errors() }
            TextAreaField { label: "Content", id: "content", value: content, errors: field_errors() }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Saving..." } else { "Add Lesson" }
            }
        }
    }
}

#[component]
fn CourseStudents(course_id: i64) -> Element {
    let auth = use_auth();
    let cache = use_query_cache();
    let toast = use_toast();
    let mut students = use_query(QueryKey::CourseStudents(course_id), move || {
        server::api::list_course_students(course_id)
    });
    let all_students = use_query(QueryKey::Users { role: Some("student".into()) }, move || {
        server::api::list_users(Some("student".to_string()))
    });
    let mut selected = use_signal(String::new);
    let mut saving = use_signal(|| false);

    let handle_enroll = move |evt: FormEvent| async move {
        evt.prevent_default();
        let Ok(student_id) = selected().parse::<i64>() else {
            toast.error("Choose a student to enroll".to_string(), ToastOptions::new());
            return;
        };
        saving.set(true);
        let body = EnrollRequest { student_id, course_id };
        match run_mutation(cache, Mutation::Enroll { course_id }, server::api::enroll_student(body)).await {
            Ok(_) => {
                selected.set(String::new());
                toast.success("Student enrolled".to_string(), ToastOptions::new());
            }
            Err(e) => toast.error(e.message, ToastOptions::new()),
        }
        saving.set(false);
    };

    let body = match students.read().clone() {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! {
            ErrorState { message, on_retry: move |_| students.restart() }
        },
        Some(Ok(list)) if list.is_empty() => rsx! {
            EmptyState { message: "No students enrolled yet." }
        },
        Some(Ok(list)) => rsx! {
            table { class: "table",
                thead { tr { th { "Name" } th { "Username" } } }
                tbody {
                    for s in list {
                        tr { key: "{s.id}",
                            td { "{s.full_name}" }
                            td { "{s.username}" }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        if auth.can(Action::AddStudent) {
            form { class: "card form-inline", onsubmit: handle_enroll,
                select {
                    value: selected(),
                    onchange: move |e: FormEvent| selected.set(e.value()),
                    option { value: "", "Select a student" }
                    if let Some(Ok(list)) = all_students.read().as_ref() {
                        for s in list.iter() {
                            option { key: "{s.id}", value: "{s.id}", "{s.full_name}" }
                        }
                    }
                }
                button { r#type: "submit", class: "button", disabled: saving(),
                    if saving() { "Enrolling..." } else { "Enroll" }
                }
            }
        }
        {body}
    }
}
