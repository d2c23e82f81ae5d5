use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::{Pool, Postgres};

use shared_types::{AppError, CreateUserRequest, User};

use crate::auth::extractors::AuthRequired;
use crate::service;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UserListParams {
    /// director, teacher, student, parent or company_admin
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api/users
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListParams),
    responses(
        (status = 200, description = "Users", body = Vec<User>),
        (status = 403, description = "Staff only", body = AppError)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Query(params): Query<UserListParams>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(service::users::list(&pool, &claims, params.role.as_deref()).await?))
}

// ---------------------------------------------------------------------------
// POST /api/users
// ---------------------------------------------------------------------------

/// Add a student, parent or staff account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 403, description = "Role may not add this kind of account", body = AppError),
        (status = 409, description = "Username or email taken", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = service::users::create(&pool, &claims, &body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
