use dioxus::prelude::*;
use shared_types::{CreateEventRequest, Event};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::*;

#[server]
pub async fn list_events() -> Result<Vec<Event>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::events::list(db, &claims)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn create_event(body: CreateEventRequest) -> Result<Event, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::events::create(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}
