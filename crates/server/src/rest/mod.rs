pub mod assignment;
pub mod attendance;
pub mod auth;
pub mod course;
pub mod event;
pub mod memorization;
pub mod parent;
pub mod user;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::db::AppState;

/// Room for multipart boundaries and the text fields around the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Users
        .route("/api/users", get(user::list_users).post(user::create_user))
        // Courses, lessons, enrollment
        .route("/api/courses", get(course::list_courses).post(course::create_course))
        .route("/api/courses/{id}", get(course::get_course))
        .route("/api/courses/{id}/lessons", get(course::list_lessons))
        .route("/api/courses/{id}/students", get(course::list_course_students))
        .route("/api/lessons", post(course::create_lesson))
        .route("/api/enrollments", post(course::enroll_student))
        // Assignments & submissions
        .route("/api/courses/{id}/assignments", get(assignment::list_course_assignments))
        .route("/api/assignments", post(assignment::create_assignment))
        .route("/api/assignments/mine", get(assignment::my_assignments))
        .route(
            "/api/assignments/submit",
            post(assignment::submit_assignment).layer(DefaultBodyLimit::max(
                crate::config::max_upload_bytes() + MULTIPART_OVERHEAD,
            )),
        )
        .route("/api/assignments/{id}/submissions", get(assignment::list_submissions))
        .route("/api/submissions/{id}/file", get(assignment::download_submission))
        // Attendance
        .route("/api/attendance", post(attendance::record_attendance))
        .route("/api/courses/{id}/attendance", get(attendance::course_attendance))
        .route("/api/stats/attendance", get(attendance::attendance_stats))
        // Memorization
        .route(
            "/api/memorization",
            get(memorization::list_memorization).post(memorization::create_memorization),
        )
        .route("/api/memorization/{id}", patch(memorization::update_memorization))
        .route("/api/stats/memorization", get(memorization::memorization_stats))
        // Events
        .route("/api/events", get(event::list_events).post(event::create_event))
        // Parents
        .route(
            "/api/parents/{parent_id}/students",
            get(parent::list_linked_students).post(parent::link_student),
        )
        .route(
            "/api/parent-portal/student/{student_id}/progress",
            get(parent::student_progress),
        )
}
