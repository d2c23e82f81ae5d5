use dioxus::prelude::*;
use shared_types::{CreateUserRequest, User};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::*;

/// School accounts, optionally filtered by role. Staff only.
#[server]
pub async fn list_users(role: Option<String>) -> Result<Vec<User>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::users::list(db, &claims, role.as_deref().filter(|r| !r.is_empty()))
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Create an account on someone's behalf. Directors may add any role;
/// teachers may add students and parents.
#[cfg_attr(feature = "server", tracing::instrument(skip(body), fields(username = %body.username, role = %body.role)))]
#[server]
pub async fn create_user(body: CreateUserRequest) -> Result<User, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::users::create(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}
