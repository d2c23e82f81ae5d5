use axum::http::StatusCode;
use axum::Router;
use serde_json::json;
use shared_types::UserRole;
use sqlx::{Pool, Postgres};

use crate::common::{create_course, enroll, get, post_json, post_multipart, signed_in, test_app};

struct Classroom {
    teacher_id: i64,
    teacher: String,
    student_id: i64,
    student: String,
    course_id: i64,
}

/// A course taught by `teacher1` with `student1` enrolled.
async fn classroom(app: &Router, pool: &Pool<Postgres>) -> Classroom {
    let (_, director) = signed_in(app, pool, "director1", UserRole::Director).await;
    let (teacher_id, teacher) = signed_in(app, pool, "teacher1", UserRole::Teacher).await;
    let (student_id, student) = signed_in(app, pool, "student1", UserRole::Student).await;
    let course_id = create_course(app, &director, teacher_id, "Tajweed I").await;
    let (status, _) = enroll(app, &director, student_id, course_id).await;
    assert_eq!(status, StatusCode::CREATED);
    Classroom {
        teacher_id,
        teacher,
        student_id,
        student,
        course_id,
    }
}

async fn create_assignment(app: &Router, class: &Classroom, title: &str) -> i64 {
    let body = json!({
        "courseId": class.course_id,
        "title": title,
        "dueDate": "2026-10-30",
        "totalPoints": 20,
        "createdBy": class.teacher_id,
    })
    .to_string();
    let (status, resp) = post_json(app, "/api/assignments", &body, Some(&class.teacher)).await;
    assert_eq!(status, StatusCode::CREATED, "assignment create failed: {resp}");
    resp["id"].as_i64().unwrap()
}

#[tokio::test]
async fn teacher_creates_and_lists_assignments() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;

    let id = create_assignment(&app, &class, "Recite Surah Al-Mulk").await;

    let uri = format!("/api/courses/{}/assignments", class.course_id);
    let (status, resp) = get(&app, &uri, Some(&class.student)).await;
    assert_eq!(status, StatusCode::OK);
    let list = resp.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"].as_i64(), Some(id));
    assert_eq!(list[0]["totalPoints"], 20);
}

#[tokio::test]
async fn created_by_must_be_the_caller() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;

    let body = json!({
        "courseId": class.course_id,
        "title": "Essay",
        "totalPoints": 10,
        "createdBy": class.student_id,
    })
    .to_string();
    let (status, _) = post_json(&app, "/api/assignments", &body, Some(&class.teacher)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_cannot_create_assignment() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;

    let body = json!({
        "courseId": class.course_id,
        "title": "Extra credit",
        "totalPoints": 10,
        "createdBy": class.student_id,
    })
    .to_string();
    let (status, _) = post_json(&app, "/api/assignments", &body, Some(&class.student)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn zero_points_is_a_validation_error() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;

    let body = json!({
        "courseId": class.course_id,
        "title": "Quiz",
        "totalPoints": 0,
        "createdBy": class.teacher_id,
    })
    .to_string();
    let (status, resp) = post_json(&app, "/api/assignments", &body, Some(&class.teacher)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["fieldErrors"]["total_points"].is_string(), "got {resp}");
}

#[tokio::test]
async fn submission_without_file_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;
    let id = create_assignment(&app, &class, "Recite Surah Al-Mulk").await;

    let id = id.to_string();
    let (status, resp) = post_multipart(
        &app,
        "/api/assignments/submit",
        &[("assignmentId", id.as_str()), ("comments", "Forgot the file")],
        None,
        Some(&class.student),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["fieldErrors"]["file"].is_string(), "got {resp}");
}

#[tokio::test]
async fn empty_file_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;
    let id = create_assignment(&app, &class, "Recite Surah Al-Mulk").await;

    let id = id.to_string();
    let (status, _) = post_multipart(
        &app,
        "/api/assignments/submit",
        &[("assignmentId", id.as_str())],
        Some(("recitation.mp3", "audio/mpeg", b"")),
        Some(&class.student),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn student_submits_a_file() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;
    let id = create_assignment(&app, &class, "Recite Surah Al-Mulk").await;

    let id_text = id.to_string();
    let (status, resp) = post_multipart(
        &app,
        "/api/assignments/submit",
        &[("assignmentId", id_text.as_str()), ("comments", "First attempt")],
        Some(("recitation.pdf", "application/pdf", b"%PDF-1.4 test")),
        Some(&class.student),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "submit failed: {resp}");
    assert_eq!(resp["assignmentId"].as_i64(), Some(id));
    assert_eq!(resp["studentId"].as_i64(), Some(class.student_id));
    assert_eq!(resp["fileName"], "recitation.pdf");
    assert_eq!(resp["fileSize"], 13);
    assert_eq!(resp["comments"], "First attempt");

    let uri = format!("/api/assignments/{id}/submissions");
    let (status, resp) = get(&app, &uri, Some(&class.teacher)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.as_array().unwrap().len(), 1);

    let (status, resp) = get(&app, "/api/assignments/mine", Some(&class.student)).await;
    assert_eq!(status, StatusCode::OK);
    let mine = resp.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["submitted"], true);
    assert!(mine[0]["submittedAt"].is_string());
}

#[tokio::test]
async fn unsubmitted_assignment_shows_as_pending() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;
    create_assignment(&app, &class, "Memorize Ayat al-Kursi").await;

    let (status, resp) = get(&app, "/api/assignments/mine", Some(&class.student)).await;

    assert_eq!(status, StatusCode::OK);
    let mine = resp.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["submitted"], false);
}

#[tokio::test]
async fn student_outside_the_course_cannot_submit() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;
    let id = create_assignment(&app, &class, "Recite Surah Al-Mulk").await;
    let (_, outsider) = signed_in(&app, &pool, "student2", UserRole::Student).await;

    let id = id.to_string();
    let (status, _) = post_multipart(
        &app,
        "/api/assignments/submit",
        &[("assignmentId", id.as_str())],
        Some(("recitation.pdf", "application/pdf", b"%PDF-1.4 test")),
        Some(&outsider),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn teacher_has_no_assignments_of_their_own() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;

    let (status, _) = get(&app, "/api/assignments/mine", Some(&class.teacher)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_cannot_view_submissions() {
    let (app, pool, _guard) = test_app().await;
    let class = classroom(&app, &pool).await;
    let id = create_assignment(&app, &class, "Recite Surah Al-Mulk").await;

    let uri = format!("/api/assignments/{id}/submissions");
    let (status, _) = get(&app, &uri, Some(&class.student)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
