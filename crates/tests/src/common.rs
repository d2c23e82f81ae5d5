use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware, Router,
};
use serde_json::{json, Value};
use shared_types::{CreateUserRequest, UserRole};
use sqlx::{Pool, Postgres};
use tokio::sync::Mutex;
use tower::ServiceExt;

use server::db::AppState;
use server::storage::{LocalObjectStore, SubmissionStore};

/// Global mutex ensuring tests run sequentially against the shared database.
/// Each test acquires this lock before truncating and seeding, preventing
/// concurrent tests from interfering with each other's data.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

pub const PASSWORD: &str = "correct-horse-42";

/// Build a test router backed by a real Postgres pool.
/// Acquires a global lock and truncates every table. The returned
/// `MutexGuard` must be held for the duration of the test.
pub async fn test_app() -> (Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>) {
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();
    if std::env::var("JWT_SECRET").map(|s| s.is_empty()).unwrap_or(true) {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TEST_DATABASE_URL or DATABASE_URL must be set for tests");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query(
        "TRUNCATE users, refresh_tokens, courses, enrollments, lessons, assignments, submissions, \
         attendance_records, memorizations, events, parent_student_relations RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to truncate");

    let upload_dir = std::env::temp_dir().join("school-portal-test-uploads");
    let store = Arc::new(SubmissionStore::Local(LocalObjectStore::new(upload_dir)));
    store.prepare().await;

    let state = AppState {
        pool: pool.clone(),
        store,
    };
    // Permissive auth middleware so extractors see claims from Bearer tokens;
    // unauthenticated requests still pass through.
    let router = server::openapi::api_router(state).layer(middleware::from_fn_with_state(
        pool.clone(),
        server::auth::middleware::auth_middleware,
    ));

    (router, pool, guard)
}

/// Insert an account directly and return its id.
pub async fn seed_user(pool: &Pool<Postgres>, username: &str, role: UserRole) -> i64 {
    let req = CreateUserRequest {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        full_name: format!("{} {}", role.label(), username),
        email: None,
        role: role.as_str().to_string(),
    };
    server::auth::session::create_account(pool, &req, role)
        .await
        .expect("Failed to seed user")
        .id
}

/// Seed an account and sign it in; returns `(user_id, access_token)`.
pub async fn signed_in(app: &Router, pool: &Pool<Postgres>, username: &str, role: UserRole) -> (i64, String) {
    let id = seed_user(pool, username, role).await;
    let body = json!({ "username": username, "password": PASSWORD }).to_string();
    let (status, response) = post_json(app, "/api/auth/login", &body, None).await;
    assert_eq!(status, StatusCode::OK, "login failed: {response}");
    let token = response["accessToken"]
        .as_str()
        .expect("login response carries an access token")
        .to_string();
    (id, token)
}

/// Create a course owned by `teacher_id` through the API as a director.
pub async fn create_course(app: &Router, director_token: &str, teacher_id: i64, name: &str) -> i64 {
    let body = json!({ "name": name, "teacherId": teacher_id }).to_string();
    let (status, response) = post_json(app, "/api/courses", &body, Some(director_token)).await;
    assert_eq!(status, StatusCode::CREATED, "course create failed: {response}");
    response["id"].as_i64().expect("course id")
}

/// Enroll a student through the API.
pub async fn enroll(app: &Router, token: &str, student_id: i64, course_id: i64) -> (StatusCode, Value) {
    let body = json!({ "studentId": student_id, "courseId": course_id }).to_string();
    post_json(app, "/api/enrollments", &body, Some(token)).await
}

fn authorized(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {t}")),
        None => builder,
    }
}

/// POST JSON, optionally with a Bearer token.
pub async fn post_json(app: &Router, uri: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = authorized(Request::builder().method("POST").uri(uri), token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

/// PATCH JSON, optionally with a Bearer token.
pub async fn patch_json(app: &Router, uri: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = authorized(Request::builder().method("PATCH").uri(uri), token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

/// GET, optionally with a Bearer token.
pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = authorized(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap();

    send(app, req).await
}

/// POST a multipart form. `file` is `(file_name, content_type, bytes)`.
pub async fn post_multipart(
    app: &Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    const BOUNDARY: &str = "----school-portal-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let req = authorized(Request::builder().method("POST").uri(uri), token)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();

    send(app, req).await
}

/// Send a request through the router and parse the response.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}
