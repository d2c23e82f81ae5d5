use axum::http::StatusCode;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{get, post_json, signed_in, test_app, PASSWORD};

fn account(username: &str, role: &str) -> String {
    json!({
        "username": username,
        "password": PASSWORD,
        "fullName": format!("Test {username}"),
        "role": role,
    })
    .to_string()
}

#[tokio::test]
async fn director_creates_a_teacher() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let (status, resp) = post_json(&app, "/api/users", &account("ustadh", "teacher"), Some(&director)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["username"], "ustadh");
    assert_eq!(resp["role"], "teacher");
    assert_eq!(resp["isActive"], true);
}

#[tokio::test]
async fn teacher_creates_a_student() {
    let (app, pool, _guard) = test_app().await;
    let (_, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let (status, resp) = post_json(&app, "/api/users", &account("yusuf", "student"), Some(&teacher)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["role"], "student");
}

#[tokio::test]
async fn teacher_cannot_create_a_teacher() {
    let (app, pool, _guard) = test_app().await;
    let (_, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let (status, _) = post_json(&app, "/api/users", &account("teacher2", "teacher"), Some(&teacher)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let (first, _) = post_json(&app, "/api/users", &account("maryam", "student"), Some(&director)).await;
    let (second, resp) = post_json(&app, "/api/users", &account("maryam", "parent"), Some(&director)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(resp["kind"], "Conflict");
}

#[tokio::test]
async fn short_password_is_a_validation_error() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let body = json!({
        "username": "zaid",
        "password": "short",
        "fullName": "Zaid",
        "role": "student",
    })
    .to_string();
    let (status, resp) = post_json(&app, "/api/users", &body, Some(&director)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["fieldErrors"]["password"].is_string(), "got {resp}");
}

#[tokio::test]
async fn list_filters_by_role() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    signed_in(&app, &pool, "student1", UserRole::Student).await;
    signed_in(&app, &pool, "student2", UserRole::Student).await;

    let (status, resp) = get(&app, "/api/users?role=student", Some(&director)).await;

    assert_eq!(status, StatusCode::OK);
    let users = resp.as_array().expect("array of users");
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u["role"] == "student"));
}

#[tokio::test]
async fn list_rejects_unknown_role_filter() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let (status, _) = get(&app, "/api/users?role=janitor", Some(&director)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
