use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{Pool, Postgres};

use shared_types::{AppError, AttendanceRecord, AttendanceStats, RecordAttendanceRequest};

use crate::auth::extractors::{actions, AuthRequired, Permitted};
use crate::service;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct AttendanceStatsParams {
    pub course_id: Option<i64>,
    /// Required for parents; ignored for students, who always see their own.
    pub student_id: Option<i64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AttendanceDateParams {
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// POST /api/attendance
// ---------------------------------------------------------------------------

/// Record a class roll; re-recording a date replaces earlier marks.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = RecordAttendanceRequest,
    responses(
        (status = 201, description = "Saved records", body = Vec<AttendanceRecord>),
        (status = 403, description = "Not permitted", body = AppError)
    ),
    tag = "attendance"
)]
pub async fn record_attendance(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::RecordAttendance>,
    Json(body): Json<RecordAttendanceRequest>,
) -> Result<(StatusCode, Json<Vec<AttendanceRecord>>), AppError> {
    let saved = service::attendance::record(&pool, auth.claims(), &body).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

// ---------------------------------------------------------------------------
// GET /api/courses/{id}/attendance
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/courses/{id}/attendance",
    params(("id" = i64, Path, description = "Course ID"), AttendanceDateParams),
    responses(
        (status = 200, description = "Roll for the date", body = Vec<AttendanceRecord>),
        (status = 403, description = "Staff only", body = AppError)
    ),
    tag = "attendance"
)]
pub async fn course_attendance(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<i64>,
    Query(params): Query<AttendanceDateParams>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    Ok(Json(
        service::attendance::for_course_date(&pool, &claims, id, params.date).await?,
    ))
}

// ---------------------------------------------------------------------------
// GET /api/stats/attendance
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/stats/attendance",
    params(AttendanceStatsParams),
    responses(
        (status = 200, description = "Attendance figures", body = AttendanceStats),
        (status = 400, description = "Parent omitted studentId", body = AppError),
        (status = 403, description = "Student not visible to caller", body = AppError)
    ),
    tag = "attendance"
)]
pub async fn attendance_stats(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Query(params): Query<AttendanceStatsParams>,
) -> Result<Json<AttendanceStats>, AppError> {
    Ok(Json(
        service::attendance::stats(&pool, &claims, params.course_id, params.student_id).await?,
    ))
}
