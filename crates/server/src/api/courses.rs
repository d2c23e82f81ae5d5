use dioxus::prelude::*;
use shared_types::{Course, CreateCourseRequest, CreateLessonRequest, Enrollment, EnrollRequest, Lesson, User};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::*;

/// Courses visible to the caller: all for staff, own enrollments for a
/// student, the children's courses for a parent.
#[server]
pub async fn list_courses() -> Result<Vec<Course>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::courses::list(db, &claims)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[server]
pub async fn get_course(course_id: i64) -> Result<Course, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::courses::get(db, &claims, course_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Create a course. Teachers default to teaching it themselves.
#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn create_course(body: CreateCourseRequest) -> Result<Course, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::courses::create(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[server]
pub async fn list_lessons(course_id: i64) -> Result<Vec<Lesson>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::courses::lessons(db, &claims, course_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn create_lesson(body: CreateLessonRequest) -> Result<Lesson, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::courses::create_lesson(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Enroll a student. A second enrollment in the same course is a conflict.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn enroll_student(body: EnrollRequest) -> Result<Enrollment, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::courses::enroll(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[server]
pub async fn list_course_students(course_id: i64) -> Result<Vec<User>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::courses::students(db, &claims, course_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}
