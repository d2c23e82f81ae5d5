// Server-only auth helpers for server functions.
// These are shared across all api/* modules.

use dioxus::prelude::*;
use shared_types::AppError;

use crate::auth::jwt::Claims;
use crate::error_convert::AppErrorExt;

/// Extract and validate the caller's identity from the current request.
/// Checks middleware-injected Claims first, falls back to cookie parsing.
pub(crate) fn require_auth() -> Result<Claims, ServerFnError> {
    use crate::auth::{cookies, jwt};

    let ctx = dioxus::fullstack::FullstackContext::current()
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    let parts = ctx.parts_mut();

    // Primary: Claims already validated by auth middleware
    if let Some(claims) = parts.extensions.get::<Claims>() {
        return Ok(claims.clone());
    }

    // Fallback: parse access token from cookies/Bearer header
    let token = cookies::extract_access_token(&parts.headers)
        .ok_or_else(|| AppError::unauthorized("Authentication required").into_server_fn_error())?;

    jwt::validate_access_token(&token)
        .map_err(|_| AppError::unauthorized("Invalid or expired token").into_server_fn_error())
}

/// Claims for the current request, `None` when signed out.
pub(crate) fn current_claims() -> Option<Claims> {
    require_auth().ok()
}

/// The refresh token cookie of the current request, if any.
pub(crate) fn request_refresh_token() -> Option<String> {
    let ctx = dioxus::fullstack::FullstackContext::current()?;
    let parts = ctx.parts_mut();
    crate::auth::cookies::extract_refresh_token(&parts.headers)
}
