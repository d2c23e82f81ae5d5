use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, Course, CreateCourseRequest, CreateLessonRequest, EnrollRequest, Enrollment, Lesson, User};

use crate::auth::extractors::{actions, AuthRequired, Permitted};
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/courses
// ---------------------------------------------------------------------------

/// Courses visible to the caller.
#[utoipa::path(
    get,
    path = "/api/courses",
    responses((status = 200, description = "Courses", body = Vec<Course>)),
    tag = "courses"
)]
pub async fn list_courses(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(service::courses::list(&pool, &claims).await?))
}

// ---------------------------------------------------------------------------
// POST /api/courses
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 403, description = "Not permitted", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "courses"
)]
pub async fn create_course(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::CreateCourse>,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = service::courses::create(&pool, auth.claims(), &body).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

// ---------------------------------------------------------------------------
// GET /api/courses/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "courses"
)]
pub async fn get_course(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(service::courses::get(&pool, &claims, id).await?))
}

// ---------------------------------------------------------------------------
// GET /api/courses/{id}/lessons
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/courses/{id}/lessons",
    params(("id" = i64, Path, description = "Course ID")),
    responses((status = 200, description = "Lessons in order", body = Vec<Lesson>)),
    tag = "courses"
)]
pub async fn list_lessons(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    Ok(Json(service::courses::lessons(&pool, &claims, id).await?))
}

// ---------------------------------------------------------------------------
// POST /api/lessons
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 403, description = "Not permitted", body = AppError)
    ),
    tag = "courses"
)]
pub async fn create_lesson(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::CreateCourse>,
    Json(body): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = service::courses::create_lesson(&pool, auth.claims(), &body).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

// ---------------------------------------------------------------------------
// POST /api/enrollments
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Student enrolled", body = Enrollment),
        (status = 409, description = "Already enrolled", body = AppError)
    ),
    tag = "courses"
)]
pub async fn enroll_student(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::AddStudent>,
    Json(body): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = service::courses::enroll(&pool, auth.claims(), &body).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

// ---------------------------------------------------------------------------
// GET /api/courses/{id}/students
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/courses/{id}/students",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled students", body = Vec<User>),
        (status = 403, description = "Staff only", body = AppError)
    ),
    tag = "courses"
)]
pub async fn list_course_students(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<i64>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(service::courses::students(&pool, &claims, id).await?))
}
