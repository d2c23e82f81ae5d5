use axum::http::StatusCode;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{create_course, enroll, get, post_json, signed_in, test_app};

#[tokio::test]
async fn protected_routes_require_a_session() {
    let (app, _pool, _guard) = test_app().await;

    for uri in ["/api/courses", "/api/users", "/api/events", "/api/memorization", "/api/stats/attendance"] {
        let (status, resp) = get(&app, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} should require auth");
        assert_eq!(resp["kind"], "Unauthorized");
    }
}

#[tokio::test]
async fn health_is_public() {
    let (app, _pool, _guard) = test_app().await;

    let (status, _) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn student_cannot_list_users() {
    let (app, pool, _guard) = test_app().await;
    let (_, token) = signed_in(&app, &pool, "student1", UserRole::Student).await;

    let (status, resp) = get(&app, "/api/users", Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["kind"], "Forbidden");
}

#[tokio::test]
async fn parent_cannot_record_attendance() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (_, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;
    let course_id = create_course(&app, &director, teacher_id, "Tajweed I").await;
    enroll(&app, &director, student_id, course_id).await;

    let body = json!({
        "courseId": course_id,
        "date": "2026-03-02",
        "records": [{ "studentId": student_id, "status": "present" }],
    })
    .to_string();
    let (status, _) = post_json(&app, "/api/attendance", &body, Some(&parent)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_cannot_create_course() {
    let (app, pool, _guard) = test_app().await;
    let (_, token) = signed_in(&app, &pool, "student1", UserRole::Student).await;

    let body = json!({ "name": "Self-made course" }).to_string();
    let (status, _) = post_json(&app, "/api/courses", &body, Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_cannot_read_another_students_memorization() {
    let (app, pool, _guard) = test_app().await;
    let (_, token) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (other_id, _) = signed_in(&app, &pool, "student2", UserRole::Student).await;

    let uri = format!("/api/memorization?studentId={other_id}");
    let (status, _) = get(&app, &uri, Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
