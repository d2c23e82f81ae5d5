use axum::{extract::State, http::StatusCode, Json};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, CreateEventRequest, Event};

use crate::auth::extractors::{actions, AuthRequired, Permitted};
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/events
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/events",
    responses((status = 200, description = "Events by date", body = Vec<Event>)),
    tag = "events"
)]
pub async fn list_events(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(service::events::list(&pool, &claims).await?))
}

// ---------------------------------------------------------------------------
// POST /api/events
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 403, description = "Not permitted", body = AppError)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::CreateEvent>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = service::events::create(&pool, auth.claims(), &body).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
