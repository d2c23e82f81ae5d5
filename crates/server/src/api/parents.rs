use dioxus::prelude::*;
use shared_types::{LinkStudentRequest, ParentStudentRelation, StudentProgress, User};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::*;

/// Children linked to a parent. A parent may only list their own.
#[server]
pub async fn list_linked_students(parent_id: i64) -> Result<Vec<User>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::guardians::students(db, &claims, parent_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn link_student(parent_id: i64, body: LinkStudentRequest) -> Result<ParentStudentRelation, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::guardians::link(db, &claims, parent_id, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[server]
pub async fn student_progress(student_id: i64) -> Result<StudentProgress, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::guardians::progress(db, &claims, student_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}
