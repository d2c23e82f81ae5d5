use axum::http::StatusCode;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{create_course, enroll, get, post_json, signed_in, test_app};

#[tokio::test]
async fn director_creates_course_for_a_teacher() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let body = json!({
        "name": "Quran Memorization",
        "description": "Juz Amma",
        "startDate": "2026-09-01",
        "endDate": "2027-06-15",
        "teacherId": teacher_id,
    })
    .to_string();
    let (status, resp) = post_json(&app, "/api/courses", &body, Some(&director)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["name"], "Quran Memorization");
    assert_eq!(resp["teacherId"].as_i64(), Some(teacher_id));
}

#[tokio::test]
async fn director_must_name_the_teacher() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let body = json!({ "name": "Arabic I" }).to_string();
    let (status, resp) = post_json(&app, "/api/courses", &body, Some(&director)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["fieldErrors"]["teacher_id"].is_string(), "got {resp}");
}

#[tokio::test]
async fn teacher_course_defaults_to_the_caller() {
    let (app, pool, _guard) = test_app().await;
    let (teacher_id, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let body = json!({ "name": "Fiqh Basics" }).to_string();
    let (status, resp) = post_json(&app, "/api/courses", &body, Some(&teacher)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["teacherId"].as_i64(), Some(teacher_id));
}

#[tokio::test]
async fn teacher_cannot_create_course_for_another_teacher() {
    let (app, pool, _guard) = test_app().await;
    let (_, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (other_id, _) = signed_in(&app, &pool, "teacher2", UserRole::Teacher).await;

    let body = json!({ "name": "Seerah", "teacherId": other_id }).to_string();
    let (status, _) = post_json(&app, "/api/courses", &body, Some(&teacher)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn end_date_before_start_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let (_, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let body = json!({
        "name": "Tafsir",
        "startDate": "2026-09-01",
        "endDate": "2026-08-01",
    })
    .to_string();
    let (status, _) = post_json(&app, "/api/courses", &body, Some(&teacher)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_enrollment_conflicts() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let course_id = create_course(&app, &director, teacher_id, "Tajweed I").await;

    let (first, _) = enroll(&app, &director, student_id, course_id).await;
    let (second, resp) = enroll(&app, &director, student_id, course_id).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(resp["kind"], "Conflict");
}

#[tokio::test]
async fn enrolling_a_teacher_as_student_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let course_id = create_course(&app, &director, teacher_id, "Tajweed I").await;

    let (status, resp) = enroll(&app, &director, teacher_id, course_id).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["kind"], "BadRequest");
}

#[tokio::test]
async fn student_sees_only_enrolled_courses() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, student) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let enrolled = create_course(&app, &director, teacher_id, "Tajweed I").await;
    let other = create_course(&app, &director, teacher_id, "Arabic I").await;
    enroll(&app, &director, student_id, enrolled).await;

    let (status, resp) = get(&app, "/api/courses", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = resp
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![enrolled]);

    let (status, _) = get(&app, &format!("/api/courses/{enrolled}"), Some(&student)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &format!("/api/courses/{other}"), Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_course_is_not_found() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let (status, resp) = get(&app, "/api/courses/9999", Some(&director)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["kind"], "NotFound");
}

#[tokio::test]
async fn lessons_are_listed_in_order() {
    let (app, pool, _guard) = test_app().await;
    let (teacher_id, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let course_id = create_course(&app, &director, teacher_id, "Tajweed I").await;

    for title in ["Makharij", "Sifaat", "Noon Sakinah"] {
        let body = json!({ "courseId": course_id, "title": title }).to_string();
        let (status, _) = post_json(&app, "/api/lessons", &body, Some(&teacher)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, resp) = get(&app, &format!("/api/courses/{course_id}/lessons"), Some(&teacher)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = resp
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Makharij", "Sifaat", "Noon Sakinah"]);
}

#[tokio::test]
async fn roster_lists_enrolled_students() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, student) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    signed_in(&app, &pool, "student2", UserRole::Student).await;
    let course_id = create_course(&app, &director, teacher_id, "Tajweed I").await;
    enroll(&app, &director, student_id, course_id).await;

    let uri = format!("/api/courses/{course_id}/students");
    let (status, resp) = get(&app, &uri, Some(&director)).await;
    assert_eq!(status, StatusCode::OK);
    let roster = resp.as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["id"].as_i64(), Some(student_id));

    let (status, _) = get(&app, &uri, Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_gets_forbidden_for_a_missing_course() {
    let (app, pool, _guard) = test_app().await;
    let (_, student) = signed_in(&app, &pool, "student1", UserRole::Student).await;

    let (status, _) = get(&app, "/api/courses/9999", Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&app, "/api/courses/9999/assignments", Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
