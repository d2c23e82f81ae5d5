use axum::http::StatusCode;
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use shared_types::UserRole;

use crate::common::{create_course, enroll, get, post_json, signed_in, test_app};

async fn link(app: &Router, director: &str, parent_id: i64, student_id: i64) -> (StatusCode, Value) {
    let body = json!({ "studentId": student_id, "relationship": "mother", "isPrimary": true }).to_string();
    post_json(app, &format!("/api/parents/{parent_id}/students"), &body, Some(director)).await
}

#[tokio::test]
async fn director_links_and_parent_sees_progress() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (parent_id, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;
    let course_id = create_course(&app, &director, teacher_id, "Tajweed I").await;
    enroll(&app, &director, student_id, course_id).await;

    let (status, relation) = link(&app, &director, parent_id, student_id).await;
    assert_eq!(status, StatusCode::CREATED, "link failed: {relation}");
    assert_eq!(relation["relationship"], "mother");
    assert_eq!(relation["isPrimary"], true);

    let body = json!({
        "courseId": course_id,
        "date": "2026-03-02",
        "records": [{ "studentId": student_id, "status": "present" }],
    })
    .to_string();
    let (status, _) = post_json(&app, "/api/attendance", &body, Some(&teacher)).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/parent-portal/student/{student_id}/progress");
    let (status, progress) = get(&app, &uri, Some(&parent)).await;
    assert_eq!(status, StatusCode::OK, "progress failed: {progress}");
    assert_eq!(progress["student"]["id"].as_i64(), Some(student_id));
    assert_eq!(progress["courses"].as_array().unwrap().len(), 1);
    assert_eq!(progress["summary"]["attendancePercentage"], 100);
    assert_eq!(progress["summary"]["assignmentsTotal"], 0);
}

#[tokio::test]
async fn unlinked_parent_cannot_see_progress() {
    let (app, pool, _guard) = test_app().await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (_, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;

    let uri = format!("/api/parent-portal/student/{student_id}/progress");
    let (status, _) = get(&app, &uri, Some(&parent)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn parent_lists_only_their_own_children() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (first_child, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (second_child, _) = signed_in(&app, &pool, "student2", UserRole::Student).await;
    let (parent_id, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;
    let (other_parent_id, _) = signed_in(&app, &pool, "parent2", UserRole::Parent).await;
    link(&app, &director, parent_id, first_child).await;
    link(&app, &director, other_parent_id, second_child).await;

    let (status, resp) = get(&app, &format!("/api/parents/{parent_id}/students"), Some(&parent)).await;
    assert_eq!(status, StatusCode::OK);
    let children = resp.as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["id"].as_i64(), Some(first_child));

    let (status, _) = get(&app, &format!("/api/parents/{other_parent_id}/students"), Some(&parent)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn linking_twice_conflicts() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (parent_id, _) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;

    let (first, _) = link(&app, &director, parent_id, student_id).await;
    let (second, _) = link(&app, &director, parent_id, student_id).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn teacher_cannot_link_guardians() {
    let (app, pool, _guard) = test_app().await;
    let (_, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (parent_id, _) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;

    let (status, _) = link(&app, &teacher, parent_id, student_id).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn parent_attendance_stats_for_a_linked_child() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (stranger_id, _) = signed_in(&app, &pool, "student2", UserRole::Student).await;
    let (parent_id, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;
    link(&app, &director, parent_id, student_id).await;

    let (status, _) = get(&app, &format!("/api/stats/attendance?studentId={student_id}"), Some(&parent)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &format!("/api/stats/attendance?studentId={stranger_id}"), Some(&parent)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unlinked_parent_sees_the_same_answer_for_any_id() {
    let (app, pool, _guard) = test_app().await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (_, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;

    for id in [student_id, teacher_id, 999_999] {
        let uri = format!("/api/parent-portal/student/{id}/progress");
        let (status, resp) = get(&app, &uri, Some(&parent)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "id {id}: {resp}");
    }
}

#[tokio::test]
async fn director_gets_not_found_for_a_missing_student() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let (status, _) = get(&app, "/api/parent-portal/student/999999/progress", Some(&director)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
