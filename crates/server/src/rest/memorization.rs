use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::{Pool, Postgres};

use shared_types::{
    AppError, CreateMemorizationRequest, Memorization, MemorizationStats, UpdateMemorizationRequest,
};

use crate::auth::extractors::{actions, AuthRequired, Permitted};
use crate::service;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct StudentFilter {
    pub student_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// GET /api/memorization
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/memorization",
    params(StudentFilter),
    responses(
        (status = 200, description = "Memorization entries", body = Vec<Memorization>),
        (status = 403, description = "Student not visible to caller", body = AppError)
    ),
    tag = "memorization"
)]
pub async fn list_memorization(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Vec<Memorization>>, AppError> {
    Ok(Json(service::memorization::list(&pool, &claims, filter.student_id).await?))
}

// ---------------------------------------------------------------------------
// POST /api/memorization
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/memorization",
    request_body = CreateMemorizationRequest,
    responses(
        (status = 201, description = "Entry recorded", body = Memorization),
        (status = 403, description = "Not permitted", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "memorization"
)]
pub async fn create_memorization(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::RecordMemorization>,
    Json(body): Json<CreateMemorizationRequest>,
) -> Result<(StatusCode, Json<Memorization>), AppError> {
    let entry = service::memorization::create(&pool, auth.claims(), &body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// ---------------------------------------------------------------------------
// PATCH /api/memorization/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    patch,
    path = "/api/memorization/{id}",
    params(("id" = i64, Path, description = "Memorization entry ID")),
    request_body = UpdateMemorizationRequest,
    responses(
        (status = 200, description = "Entry updated", body = Memorization),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "memorization"
)]
pub async fn update_memorization(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::RecordMemorization>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateMemorizationRequest>,
) -> Result<Json<Memorization>, AppError> {
    Ok(Json(service::memorization::update(&pool, auth.claims(), id, &body).await?))
}

// ---------------------------------------------------------------------------
// GET /api/stats/memorization
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/stats/memorization",
    params(StudentFilter),
    responses((status = 200, description = "Completed count and average progress", body = MemorizationStats)),
    tag = "memorization"
)]
pub async fn memorization_stats(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<MemorizationStats>, AppError> {
    Ok(Json(service::memorization::stats(&pool, &claims, filter.student_id).await?))
}
