use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::{Pool, Postgres};

use super::cookies::{self, CookieSlot, PendingCookieAction};
use super::jwt::validate_access_token;
use super::session::{self, SessionTokens};

/// Permissive auth middleware.
///
/// On each request:
/// 1. Validates the access token from cookies (or Bearer header fallback)
/// 2. If missing or expired, attempts transparent refresh using the refresh cookie
/// 3. Inserts a `CookieSlot` so server functions can schedule cookie changes
/// 4. After the handler runs, applies any pending cookie actions to the response
///
/// Never rejects a request; extractors and server functions decide authorization.
pub async fn auth_middleware(
    State(pool): State<Pool<Postgres>>,
    mut req: Request,
    next: Next,
) -> Response {
    let headers = req.headers().clone();
    let mut refreshed: Option<SessionTokens> = None;

    let claims = cookies::extract_access_token(&headers)
        .and_then(|token| validate_access_token(&token).ok());

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
        }
        None => {
            if let Some(refresh_token) = cookies::extract_refresh_token(&headers) {
                if let Some((claims, tokens)) = session::rotate_refresh(&pool, &refresh_token).await {
                    tracing::debug!(user_id = claims.sub, "Transparently refreshed session");
                    req.extensions_mut().insert(claims);
                    refreshed = Some(tokens);
                }
            }
        }
    }

    let cookie_slot = CookieSlot::default();
    req.extensions_mut().insert(cookie_slot.clone());

    let mut response = next.run(req).await;

    if let Some(tokens) = refreshed {
        cookies::set_auth_cookies(
            response.headers_mut(),
            &tokens.access_token,
            &tokens.refresh_token,
        );
    }

    // A server function's explicit action (login, logout) wins over the refresh.
    match cookie_slot.take() {
        Some(PendingCookieAction::Set {
            access_token,
            refresh_token,
        }) => {
            cookies::set_auth_cookies(response.headers_mut(), &access_token, &refresh_token);
        }
        Some(PendingCookieAction::Clear) => {
            cookies::clear_auth_cookies(response.headers_mut());
        }
        None => {}
    }

    response
}
