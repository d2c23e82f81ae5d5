use axum::http::StatusCode;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{create_course, enroll, get, patch_json, post_json, signed_in, test_app};

#[tokio::test]
async fn teacher_logs_and_completes_a_surah() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, student) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let course_id = create_course(&app, &director, teacher_id, "Hifz").await;
    enroll(&app, &director, student_id, course_id).await;

    let body = json!({
        "studentId": student_id,
        "courseId": course_id,
        "surah": "Al-Mulk",
        "ayahStart": 1,
        "ayahEnd": 30,
        "progress": 40,
    })
    .to_string();
    let (status, created) = post_json(&app, "/api/memorization", &body, Some(&teacher)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
    assert_eq!(created["isCompleted"], false);
    let id = created["id"].as_i64().unwrap();

    let body = json!({ "progress": 100, "isCompleted": true }).to_string();
    let (status, updated) = patch_json(&app, &format!("/api/memorization/{id}"), &body, Some(&teacher)).await;
    assert_eq!(status, StatusCode::OK, "update failed: {updated}");
    assert_eq!(updated["progress"], 100);
    assert_eq!(updated["isCompleted"], true);
    assert_eq!(updated["surah"], "Al-Mulk", "untouched fields keep their value");

    let (status, stats) = get(&app, "/api/stats/memorization", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["completedCount"], 1);
    assert_eq!(stats["totalCount"], 1);
    assert_eq!(stats["averageProgress"], 100);
}

#[tokio::test]
async fn ending_ayah_before_start_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let course_id = create_course(&app, &director, teacher_id, "Hifz").await;
    enroll(&app, &director, student_id, course_id).await;

    let body = json!({
        "studentId": student_id,
        "courseId": course_id,
        "surah": "Al-Baqarah",
        "ayahStart": 20,
        "ayahEnd": 10,
    })
    .to_string();
    let (status, resp) = post_json(&app, "/api/memorization", &body, Some(&teacher)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["fieldErrors"]["ayah_end"].is_string(), "got {resp}");
}

#[tokio::test]
async fn student_must_be_enrolled_in_the_course() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, _) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let course_id = create_course(&app, &director, teacher_id, "Hifz").await;

    let body = json!({
        "studentId": student_id,
        "courseId": course_id,
        "surah": "Yaseen",
        "ayahStart": 1,
        "ayahEnd": 12,
    })
    .to_string();
    let (status, _) = post_json(&app, "/api/memorization", &body, Some(&teacher)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn student_cannot_log_memorization() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, _) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (student_id, student) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let course_id = create_course(&app, &director, teacher_id, "Hifz").await;
    enroll(&app, &director, student_id, course_id).await;

    let body = json!({
        "studentId": student_id,
        "courseId": course_id,
        "surah": "Al-Kahf",
        "ayahStart": 1,
        "ayahEnd": 10,
    })
    .to_string();
    let (status, _) = post_json(&app, "/api/memorization", &body, Some(&student)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn updating_a_missing_entry_is_not_found() {
    let (app, pool, _guard) = test_app().await;
    let (_, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let body = json!({ "progress": 50 }).to_string();
    let (status, _) = patch_json(&app, "/api/memorization/4242", &body, Some(&teacher)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn student_list_is_scoped_to_themself() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (teacher_id, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;
    let (first_id, first) = signed_in(&app, &pool, "student1", UserRole::Student).await;
    let (second_id, _) = signed_in(&app, &pool, "student2", UserRole::Student).await;
    let course_id = create_course(&app, &director, teacher_id, "Hifz").await;

    for (student_id, surah) in [(first_id, "An-Naba"), (second_id, "An-Naziat")] {
        enroll(&app, &director, student_id, course_id).await;
        let body = json!({
            "studentId": student_id,
            "courseId": course_id,
            "surah": surah,
            "ayahStart": 1,
            "ayahEnd": 40,
        })
        .to_string();
        let (status, _) = post_json(&app, "/api/memorization", &body, Some(&teacher)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, resp) = get(&app, "/api/memorization", Some(&first)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = resp.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["surah"], "An-Naba");

    let (_, resp) = get(&app, "/api/memorization", Some(&teacher)).await;
    assert_eq!(resp.as_array().unwrap().len(), 2);
}
