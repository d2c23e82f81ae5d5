use axum::http::StatusCode;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{get, post_json, seed_user, signed_in, test_app, PASSWORD};

#[tokio::test]
async fn login_returns_user_and_token() {
    let (app, pool, _guard) = test_app().await;
    seed_user(&pool, "amina", UserRole::Teacher).await;

    let body = json!({ "username": "amina", "password": PASSWORD }).to_string();
    let (status, resp) = post_json(&app, "/api/auth/login", &body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["user"]["username"], "amina");
    assert_eq!(resp["user"]["role"], "teacher");
    assert!(resp["accessToken"].is_string());
    assert!(resp["user"].get("password").is_none(), "password hash must never leave the server");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (app, pool, _guard) = test_app().await;
    seed_user(&pool, "bilal", UserRole::Student).await;

    let body = json!({ "username": "bilal", "password": "not-the-password" }).to_string();
    let (status, resp) = post_json(&app, "/api/auth/login", &body, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["kind"], "Unauthorized");
}

#[tokio::test]
async fn login_with_unknown_user_is_unauthorized() {
    let (app, _pool, _guard) = test_app().await;

    let body = json!({ "username": "nobody", "password": PASSWORD }).to_string();
    let (status, _) = post_json(&app, "/api/auth/login", &body, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_the_signed_in_user() {
    let (app, pool, _guard) = test_app().await;
    let (id, token) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let (status, resp) = get(&app, "/api/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["id"].as_i64(), Some(id));
    assert_eq!(resp["role"], "director");
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let (app, _pool, _guard) = test_app().await;

    let (status, _) = get(&app, "/api/auth/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_with_garbage_token_is_unauthorized() {
    let (app, _pool, _guard) = test_app().await;

    let (status, _) = get(&app, "/api/auth/me", Some("not.a.jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn self_registration_is_off_by_default() {
    let (app, _pool, _guard) = test_app().await;

    let body = json!({
        "username": "newstudent",
        "password": PASSWORD,
        "fullName": "New Student",
        "role": "student",
    })
    .to_string();
    let (status, resp) = post_json(&app, "/api/auth/register", &body, None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["kind"], "Forbidden");
}

#[tokio::test]
async fn logout_always_succeeds() {
    let (app, pool, _guard) = test_app().await;
    let (_, token) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let (status, _) = post_json(&app, "/api/auth/logout", "", Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = post_json(&app, "/api/auth/logout", "", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
