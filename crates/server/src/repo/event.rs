use shared_types::{AppError, CreateEventRequest, Event};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

macro_rules! event_columns {
    () => {
        "id, title, description, date, end_date, location, created_by_id"
    };
}

pub async fn create(
    pool: &Pool<Postgres>,
    req: &CreateEventRequest,
    created_by_id: i64,
) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>(concat!(
        "INSERT INTO events (title, description, date, end_date, location, created_by_id)",
        " VALUES ($1, $2, $3, $4, $5, $6) RETURNING ",
        event_columns!()
    ))
    .bind(req.title.trim())
    .bind(req.description.as_deref())
    .bind(req.date)
    .bind(req.end_date)
    .bind(req.location.as_deref())
    .bind(created_by_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// All events in calendar order.
pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<Event>, AppError> {
    sqlx::query_as::<_, Event>(concat!(
        "SELECT ",
        event_columns!(),
        " FROM events ORDER BY date ASC, id ASC"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
