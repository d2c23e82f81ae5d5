use chrono::NaiveDate;
use shared_types::policy::Action;
use shared_types::{AppError, AttendanceRecord, AttendanceStats, RecordAttendanceRequest, UserRole};
use sqlx::{Pool, Postgres};

use crate::access;
use crate::auth::extractors::{caller_role, require_action};
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// Record a class roll. Every listed student must be enrolled in the course.
#[tracing::instrument(skip(pool, req), fields(course_id = req.course_id, date = %req.date, count = req.records.len()))]
pub async fn record(
    pool: &Pool<Postgres>,
    claims: &Claims,
    req: &RecordAttendanceRequest,
) -> Result<Vec<AttendanceRecord>, AppError> {
    require_action(claims, Action::RecordAttendance)?;
    req.validate_request()?;
    repo::course::get(pool, req.course_id).await?;

    for entry in &req.records {
        if !repo::enrollment::is_enrolled(pool, entry.student_id, req.course_id).await? {
            return Err(AppError::bad_request(format!(
                "Student {} is not enrolled in this course",
                entry.student_id
            )));
        }
    }

    repo::attendance::upsert_batch(pool, req.course_id, req.date, &req.records).await
}

/// A course's roll for one date, staff only.
pub async fn for_course_date(
    pool: &Pool<Postgres>,
    claims: &Claims,
    course_id: i64,
    date: NaiveDate,
) -> Result<Vec<AttendanceRecord>, AppError> {
    access::ensure_staff(claims)?;
    repo::course::get(pool, course_id).await?;
    repo::attendance::list_by_course_date(pool, course_id, date).await
}

/// Attendance figures. Staff may filter by course and student; a student
/// always sees their own; a parent must name a linked student.
pub async fn stats(
    pool: &Pool<Postgres>,
    claims: &Claims,
    course_id: Option<i64>,
    student_id: Option<i64>,
) -> Result<AttendanceStats, AppError> {
    if caller_role(claims)? == UserRole::Parent && student_id.is_none() {
        return Err(AppError::bad_request("studentId is required"));
    }
    let scope = access::resolve_student_scope(pool, claims, student_id).await?;
    let counts = repo::attendance::counts_by_course(pool, course_id, scope.single()).await?;
    Ok(AttendanceStats::from_courses(&counts))
}
