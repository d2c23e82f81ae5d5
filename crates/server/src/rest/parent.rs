use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, LinkStudentRequest, ParentStudentRelation, StudentProgress, User};

use crate::auth::extractors::{actions, AuthRequired, Permitted};
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/parents/{parent_id}/students
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/parents/{parent_id}/students",
    params(("parent_id" = i64, Path, description = "Parent user ID")),
    responses(
        (status = 200, description = "Linked students", body = Vec<User>),
        (status = 403, description = "Another parent's children", body = AppError)
    ),
    tag = "parents"
)]
pub async fn list_linked_students(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(parent_id): Path<i64>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(service::guardians::students(&pool, &claims, parent_id).await?))
}

// ---------------------------------------------------------------------------
// POST /api/parents/{parent_id}/students
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/parents/{parent_id}/students",
    params(("parent_id" = i64, Path, description = "Parent user ID")),
    request_body = LinkStudentRequest,
    responses(
        (status = 201, description = "Student linked", body = ParentStudentRelation),
        (status = 409, description = "Already linked", body = AppError)
    ),
    tag = "parents"
)]
pub async fn link_student(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::ManageGuardians>,
    Path(parent_id): Path<i64>,
    Json(body): Json<LinkStudentRequest>,
) -> Result<(StatusCode, Json<ParentStudentRelation>), AppError> {
    let relation = service::guardians::link(&pool, auth.claims(), parent_id, &body).await?;
    Ok((StatusCode::CREATED, Json(relation)))
}

// ---------------------------------------------------------------------------
// GET /api/parent-portal/student/{student_id}/progress
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/parent-portal/student/{student_id}/progress",
    params(("student_id" = i64, Path, description = "Student user ID")),
    responses(
        (status = 200, description = "Progress summary", body = StudentProgress),
        (status = 403, description = "Student not linked to caller", body = AppError)
    ),
    tag = "parents"
)]
pub async fn student_progress(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(student_id): Path<i64>,
) -> Result<Json<StudentProgress>, AppError> {
    Ok(Json(service::guardians::progress(&pool, &claims, student_id).await?))
}
