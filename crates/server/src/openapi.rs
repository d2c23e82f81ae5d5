use axum::Router;
use shared_types::{
    AppError, AppErrorKind, Assignment, AssignmentProgress, AttendanceEntry, AttendanceRecord,
    AttendanceStats, AttendanceStatus, AuthResponse, AuthUser, Course, CreateAssignmentRequest,
    CreateCourseRequest, CreateEventRequest, CreateLessonRequest, CreateMemorizationRequest,
    CreateUserRequest, EnrollRequest, Enrollment, Event, Lesson, LinkStudentRequest,
    LoginRequest, LowAttendanceClass, Memorization, MemorizationStats, ParentStudentRelation,
    ProgressSummary, RecordAttendanceRequest, StudentProgress, Submission,
    UpdateMemorizationRequest, User, UserRole,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        rest::auth::register,
        rest::auth::login,
        rest::auth::logout,
        rest::auth::me,
        // Users
        rest::user::list_users,
        rest::user::create_user,
        // Courses
        rest::course::list_courses,
        rest::course::create_course,
        rest::course::get_course,
        rest::course::list_lessons,
        rest::course::create_lesson,
        rest::course::enroll_student,
        rest::course::list_course_students,
        // Assignments
        rest::assignment::list_course_assignments,
        rest::assignment::my_assignments,
        rest::assignment::create_assignment,
        rest::assignment::submit_assignment,
        rest::assignment::list_submissions,
        rest::assignment::download_submission,
        // Attendance
        rest::attendance::record_attendance,
        rest::attendance::course_attendance,
        rest::attendance::attendance_stats,
        // Memorization
        rest::memorization::list_memorization,
        rest::memorization::create_memorization,
        rest::memorization::update_memorization,
        rest::memorization::memorization_stats,
        // Events
        rest::event::list_events,
        rest::event::create_event,
        // Parents
        rest::parent::list_linked_students,
        rest::parent::link_student,
        rest::parent::student_progress,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind,
        // Accounts
        User, UserRole, AuthUser, AuthResponse, LoginRequest, CreateUserRequest,
        // Courses
        Course, Lesson, Enrollment, CreateCourseRequest, CreateLessonRequest, EnrollRequest,
        // Assignments
        Assignment, Submission, AssignmentProgress, CreateAssignmentRequest,
        rest::assignment::SubmissionForm,
        // Attendance
        AttendanceStatus, AttendanceRecord, AttendanceEntry, RecordAttendanceRequest,
        AttendanceStats, LowAttendanceClass,
        // Memorization
        Memorization, MemorizationStats, CreateMemorizationRequest, UpdateMemorizationRequest,
        // Events
        Event, CreateEventRequest,
        // Parents
        ParentStudentRelation, LinkStudentRequest, StudentProgress, ProgressSummary,
        health::HealthResponse,
    )),
    tags(
        (name = "auth", description = "Sign-in, registration and session endpoints"),
        (name = "users", description = "Student, parent and staff accounts"),
        (name = "courses", description = "Courses, lessons and enrollment"),
        (name = "assignments", description = "Assignments and file submissions"),
        (name = "attendance", description = "Class rolls and attendance statistics"),
        (name = "memorization", description = "Quran memorization tracking"),
        (name = "events", description = "School calendar"),
        (name = "parents", description = "Guardian links and the parent portal"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Islamic Studies Learning Platform API",
        description = "Courses, assignments, attendance and memorization for an Islamic studies school",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`,
/// the health check at `/health` and the REST API at `/api/*`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
