use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, AuthResponse, AuthUser, CreateUserRequest, LoginRequest, User};

use crate::auth::extractors::{AuthRequired, MaybeAuth};
use crate::auth::{cookies, session};
use crate::error_convert::ValidateRequest;

/// Start a session for `user`: cookies for browsers, token in the body for API clients.
async fn signed_in(pool: &Pool<Postgres>, user: User) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let tokens = session::issue_session(pool, &user).await?;
    let mut headers = HeaderMap::new();
    cookies::set_auth_cookies(&mut headers, &tokens.access_token, &tokens.refresh_token);
    Ok((
        headers,
        Json(AuthResponse {
            user: AuthUser::from(user),
            access_token: tokens.access_token,
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /api/auth/register
// ---------------------------------------------------------------------------

/// Self-register a student or parent account (when enabled).
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = AuthResponse),
        (status = 403, description = "Self-registration disabled", body = AppError),
        (status = 409, description = "Username taken", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    body.validate_request()?;
    let user = session::register(&pool, &body).await?;
    tracing::info!(user_id = user.id, role = %user.role, "Self-registered");
    let (headers, json) = signed_in(&pool, user).await?;
    Ok((StatusCode::CREATED, headers, json))
}

// ---------------------------------------------------------------------------
// POST /api/auth/login
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    body.validate_request()?;
    let user = session::authenticate(&pool, &body.username, &body.password).await?;
    signed_in(&pool, user).await
}

// ---------------------------------------------------------------------------
// POST /api/auth/logout
// ---------------------------------------------------------------------------

/// Revoke the refresh token and clear both cookies. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Signed out")),
    tag = "auth"
)]
pub async fn logout(
    State(pool): State<Pool<Postgres>>,
    MaybeAuth(claims): MaybeAuth,
    request_headers: HeaderMap,
) -> Result<(StatusCode, HeaderMap), AppError> {
    let refresh = cookies::extract_refresh_token(&request_headers);
    session::end_session(&pool, refresh.as_deref()).await?;
    if let Some(claims) = claims {
        tracing::info!(user_id = claims.sub, "Signed out");
    }
    let mut headers = HeaderMap::new();
    cookies::clear_auth_cookies(&mut headers);
    Ok((StatusCode::NO_CONTENT, headers))
}

// ---------------------------------------------------------------------------
// GET /api/auth/me
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthUser),
        (status = 401, description = "Not signed in", body = AppError)
    ),
    tag = "auth"
)]
pub async fn me(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<AuthUser>, AppError> {
    session::current_user(&pool, &claims)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}
