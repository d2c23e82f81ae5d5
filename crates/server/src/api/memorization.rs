use dioxus::prelude::*;
use shared_types::{CreateMemorizationRequest, Memorization, MemorizationStats, UpdateMemorizationRequest};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::*;

#[server]
pub async fn list_memorization(student_id: Option<i64>) -> Result<Vec<Memorization>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::memorization::list(db, &claims, student_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[server]
pub async fn memorization_stats(student_id: Option<i64>) -> Result<MemorizationStats, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::memorization::stats(db, &claims, student_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn record_memorization(body: CreateMemorizationRequest) -> Result<Memorization, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::memorization::create(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Update progress on a passage. Reaching 100% marks it completed.
#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn update_memorization(id: i64, body: UpdateMemorizationRequest) -> Result<Memorization, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::memorization::update(db, &claims, id, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}
