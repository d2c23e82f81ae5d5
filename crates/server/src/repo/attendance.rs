use chrono::NaiveDate;
use shared_types::{AppError, AttendanceEntry, AttendanceRecord, CourseAttendanceCounts};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

macro_rules! attendance_columns {
    () => {
        "id, course_id, student_id, date, status, notes"
    };
}

/// Record a whole class register in one transaction. A second submission for
/// the same student, course and date replaces the earlier status.
pub async fn upsert_batch(
    pool: &Pool<Postgres>,
    course_id: i64,
    date: NaiveDate,
    entries: &[AttendanceEntry],
) -> Result<Vec<AttendanceRecord>, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;
    let mut saved = Vec::with_capacity(entries.len());

    for entry in entries {
        let record = sqlx::query_as::<_, AttendanceRecord>(concat!(
            "INSERT INTO attendance_records (course_id, student_id, date, status, notes)",
            " VALUES ($1, $2, $3, $4, $5)",
            " ON CONFLICT (student_id, course_id, date)",
            " DO UPDATE SET status = EXCLUDED.status, notes = EXCLUDED.notes",
            " RETURNING ",
            attendance_columns!()
        ))
        .bind(course_id)
        .bind(entry.student_id)
        .bind(date)
        .bind(entry.status.as_str())
        .bind(entry.notes.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
        saved.push(record);
    }

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
    Ok(saved)
}

pub async fn list_by_course_date(
    pool: &Pool<Postgres>,
    course_id: i64,
    date: NaiveDate,
) -> Result<Vec<AttendanceRecord>, AppError> {
    sqlx::query_as::<_, AttendanceRecord>(concat!(
        "SELECT ",
        attendance_columns!(),
        " FROM attendance_records WHERE course_id = $1 AND date = $2 ORDER BY student_id"
    ))
    .bind(course_id)
    .bind(date)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Status counts per course. Either filter may be omitted.
pub async fn counts_by_course(
    pool: &Pool<Postgres>,
    course_id: Option<i64>,
    student_id: Option<i64>,
) -> Result<Vec<CourseAttendanceCounts>, AppError> {
    sqlx::query_as::<_, CourseAttendanceCounts>(
        r#"
        SELECT
            c.id AS course_id,
            c.name AS course_name,
            COUNT(*) FILTER (WHERE a.status = 'present') AS present,
            COUNT(*) FILTER (WHERE a.status = 'absent') AS absent,
            COUNT(*) FILTER (WHERE a.status = 'late') AS late,
            COUNT(*) FILTER (WHERE a.status = 'excused') AS excused
        FROM attendance_records a
        JOIN courses c ON c.id = a.course_id
        WHERE ($1::BIGINT IS NULL OR a.course_id = $1)
          AND ($2::BIGINT IS NULL OR a.student_id = $2)
        GROUP BY c.id, c.name
        ORDER BY c.name, c.id
        "#,
    )
    .bind(course_id)
    .bind(student_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
