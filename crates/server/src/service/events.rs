use shared_types::policy::Action;
use shared_types::{AppError, CreateEventRequest, Event};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::{caller_role, require_action};
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// Every signed-in role sees the school calendar.
pub async fn list(pool: &Pool<Postgres>, claims: &Claims) -> Result<Vec<Event>, AppError> {
    caller_role(claims)?;
    repo::event::list(pool).await
}

#[tracing::instrument(skip(pool, req), fields(title = %req.title))]
pub async fn create(pool: &Pool<Postgres>, claims: &Claims, req: &CreateEventRequest) -> Result<Event, AppError> {
    require_action(claims, Action::CreateEvent)?;
    req.validate_request()?;
    req.check_dates()?;
    repo::event::create(pool, req, claims.sub).await
}
