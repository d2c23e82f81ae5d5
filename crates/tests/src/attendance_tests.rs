use axum::http::StatusCode;
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use shared_types::UserRole;
use sqlx::{Pool, Postgres};

use crate::common::{create_course, enroll, get, post_json, signed_in, test_app};

struct Roll {
    director: String,
    teacher: String,
    course_id: i64,
    students: Vec<i64>,
}

/// A course taught by `teacher1` with `count` enrolled students.
async fn roll(app: &Router, pool: &Pool<Postgres>, count: usize) -> Roll {
    let (_, director) = signed_in(app, pool, "director1", UserRole::Director).await;
    let (teacher_id, teacher) = signed_in(app, pool, "teacher1", UserRole::Teacher).await;
    let course_id = create_course(app, &director, teacher_id, "Tajweed I").await;
    let mut students = Vec::new();
    for n in 1..=count {
        let (id, _) = signed_in(app, pool, &format!("student{n}"), UserRole::Student).await;
        enroll(app, &director, id, course_id).await;
        students.push(id);
    }
    Roll {
        director,
        teacher,
        course_id,
        students,
    }
}

async fn record(app: &Router, token: &str, course_id: i64, date: &str, marks: &[(i64, &str)]) -> (StatusCode, Value) {
    let records: Vec<Value> = marks
        .iter()
        .map(|(id, status)| json!({ "studentId": id, "status": status }))
        .collect();
    let body = json!({ "courseId": course_id, "date": date, "records": records }).to_string();
    post_json(app, "/api/attendance", &body, Some(token)).await
}

#[tokio::test]
async fn teacher_records_a_class_roll() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 2).await;

    let (status, resp) = record(
        &app,
        &roll.teacher,
        roll.course_id,
        "2026-03-02",
        &[(roll.students[0], "present"), (roll.students[1], "late")],
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "record failed: {resp}");
    assert_eq!(resp.as_array().unwrap().len(), 2);

    let uri = format!("/api/courses/{}/attendance?date=2026-03-02", roll.course_id);
    let (status, resp) = get(&app, &uri, Some(&roll.teacher)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn re_recording_a_date_updates_in_place() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 1).await;
    let student = roll.students[0];

    record(&app, &roll.teacher, roll.course_id, "2026-03-02", &[(student, "absent")]).await;
    let (status, _) = record(&app, &roll.teacher, roll.course_id, "2026-03-02", &[(student, "present")]).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/courses/{}/attendance?date=2026-03-02", roll.course_id);
    let (_, resp) = get(&app, &uri, Some(&roll.teacher)).await;
    let records = resp.as_array().unwrap();
    assert_eq!(records.len(), 1, "one record per student, course and date");
    assert_eq!(records[0]["status"], "present");
}

#[tokio::test]
async fn unenrolled_student_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 1).await;
    let (outsider, _) = signed_in(&app, &pool, "visitor", UserRole::Student).await;

    let (status, resp) = record(&app, &roll.teacher, roll.course_id, "2026-03-02", &[(outsider, "present")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["kind"], "BadRequest");
}

#[tokio::test]
async fn empty_roll_is_a_validation_error() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 1).await;

    let (status, _) = record(&app, &roll.teacher, roll.course_id, "2026-03-02", &[]).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn director_cannot_take_attendance() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 1).await;

    let (status, _) = record(&app, &roll.director, roll.course_id, "2026-03-02", &[(roll.students[0], "present")]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stats_ignore_late_and_excused() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 4).await;
    let s = &roll.students;

    record(
        &app,
        &roll.teacher,
        roll.course_id,
        "2026-03-02",
        &[(s[0], "present"), (s[1], "present"), (s[2], "absent"), (s[3], "late")],
    )
    .await;
    record(&app, &roll.teacher, roll.course_id, "2026-03-03", &[(s[0], "present"), (s[3], "excused")]).await;

    let (status, resp) = get(&app, "/api/stats/attendance", Some(&roll.director)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["presentCount"], 3);
    assert_eq!(resp["absentCount"], 1);
    assert_eq!(resp["lateCount"], 1);
    assert_eq!(resp["excusedCount"], 1);
    // 3 / (3 + 1)
    assert_eq!(resp["presentPercentage"], 75);
}

#[tokio::test]
async fn low_attendance_courses_are_flagged() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 2).await;
    let s = &roll.students;

    record(&app, &roll.teacher, roll.course_id, "2026-03-02", &[(s[0], "present"), (s[1], "absent")]).await;

    let (_, resp) = get(&app, "/api/stats/attendance", Some(&roll.teacher)).await;

    let flagged = resp["lowAttendanceClasses"].as_array().unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0]["courseId"].as_i64(), Some(roll.course_id));
    assert_eq!(flagged[0]["presentPercentage"], 50);
}

#[tokio::test]
async fn student_stats_cover_only_themself() {
    let (app, pool, _guard) = test_app().await;
    let roll = roll(&app, &pool, 2).await;
    let s = &roll.students;
    record(&app, &roll.teacher, roll.course_id, "2026-03-02", &[(s[0], "present"), (s[1], "absent")]).await;

    let body = json!({ "username": "student1", "password": crate::common::PASSWORD }).to_string();
    let (_, login) = post_json(&app, "/api/auth/login", &body, None).await;
    let token = login["accessToken"].as_str().unwrap();

    let (status, resp) = get(&app, "/api/stats/attendance", Some(token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["presentCount"], 1);
    assert_eq!(resp["absentCount"], 0);
    assert_eq!(resp["presentPercentage"], 100);
}

#[tokio::test]
async fn parent_must_name_a_student() {
    let (app, pool, _guard) = test_app().await;
    let (_, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;

    let (status, _) = get(&app, "/api/stats/attendance", Some(&parent)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
