use dioxus::prelude::*;
use shared_types::{AuthUser, FeatureFlags};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::{AppErrorExt, ValidateRequest};

#[cfg(feature = "server")]
use super::auth::*;

/// Sign in with username and password. Sets HTTP-only auth cookies on success.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn login(username: String, password: String) -> Result<AuthUser, ServerFnError> {
    use crate::auth::{cookies, session};
    use shared_types::LoginRequest;

    let req = LoginRequest { username, password };
    req.validate_request().map_err(|e| e.into_server_fn_error())?;

    let db = get_db().await;
    let user = session::authenticate(db, &req.username, &req.password).await.map_err(|e| e.into_server_fn_error())?;
    let tokens = session::issue_session(db, &user).await.map_err(|e| e.into_server_fn_error())?;
    cookies::schedule_auth_cookies(&tokens.access_token, &tokens.refresh_token);

    tracing::info!(user_id = user.id, role = %user.role, "Signed in");
    Ok(AuthUser::from(user))
}

/// Self-register a student or parent account (when enabled) and sign in.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn register(
    username: String,
    password: String,
    full_name: String,
    email: Option<String>,
    role: String,
) -> Result<AuthUser, ServerFnError> {
    use crate::auth::{cookies, session};
    use shared_types::CreateUserRequest;

    let req = CreateUserRequest {
        username,
        password,
        full_name,
        email: email.filter(|e| !e.trim().is_empty()),
        role,
    };
    req.validate_request().map_err(|e| e.into_server_fn_error())?;

    let db = get_db().await;
    let user = session::register(db, &req).await.map_err(|e| e.into_server_fn_error())?;
    let tokens = session::issue_session(db, &user).await.map_err(|e| e.into_server_fn_error())?;
    cookies::schedule_auth_cookies(&tokens.access_token, &tokens.refresh_token);
    Ok(AuthUser::from(user))
}

/// The signed-in user, or `None`. Clears stale cookies when the account
/// behind a valid token is gone or disabled.
#[server]
pub async fn get_current_user() -> Result<Option<AuthUser>, ServerFnError> {
    let Some(claims) = current_claims() else {
        return Ok(None);
    };

    let db = get_db().await;
    let user = crate::auth::session::current_user(db, &claims).await.map_err(|e| e.into_server_fn_error())?;
    if user.is_none() {
        tracing::warn!(user_id = claims.sub, "Token references a missing or disabled user, clearing cookies");
        crate::auth::cookies::schedule_clear_cookies();
    }
    Ok(user)
}

/// Revoke the refresh token and clear both auth cookies.
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    let db = get_db().await;
    let refresh = request_refresh_token();
    if let Err(e) = crate::auth::session::end_session(db, refresh.as_deref()).await {
        tracing::warn!(error = %e, "Failed to revoke refresh token on logout");
    }
    crate::auth::cookies::schedule_clear_cookies();
    Ok(())
}

/// Feature flags for the client; all off when the config is missing.
#[server]
pub async fn get_feature_flags() -> Result<FeatureFlags, ServerFnError> {
    Ok(crate::config::feature_flags().clone())
}

/// Submission size limit, so the upload form checks against the same value.
#[server]
pub async fn get_upload_limit() -> Result<u64, ServerFnError> {
    Ok(crate::config::max_upload_bytes() as u64)
}
