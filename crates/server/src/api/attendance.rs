use dioxus::prelude::*;
use shared_types::{AttendanceRecord, AttendanceStats, RecordAttendanceRequest};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::*;

/// Save a class roll. Re-recording a student for the same date overwrites.
#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn record_attendance(body: RecordAttendanceRequest) -> Result<Vec<AttendanceRecord>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::attendance::record(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// The roll for one course and date (`YYYY-MM-DD`).
#[server]
pub async fn course_attendance(course_id: i64, date: String) -> Result<Vec<AttendanceRecord>, ServerFnError> {
    use shared_types::AppError;

    let claims = require_auth()?;
    let date = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::field("date", "Date must be YYYY-MM-DD").into_server_fn_error())?;

    let db = get_db().await;
    crate::service::attendance::for_course_date(db, &claims, course_id, date)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[server]
pub async fn attendance_stats(
    course_id: Option<i64>,
    student_id: Option<i64>,
) -> Result<AttendanceStats, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::attendance::stats(db, &claims, course_id, student_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}
