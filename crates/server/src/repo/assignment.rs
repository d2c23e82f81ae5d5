use shared_types::{AppError, Assignment, AssignmentProgress, CreateAssignmentRequest};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

macro_rules! assignment_columns {
    () => {
        "a.id, a.course_id, a.title, a.description, a.due_date, a.total_points, a.created_by, a.created_at"
    };
}

pub async fn create(pool: &Pool<Postgres>, req: &CreateAssignmentRequest) -> Result<Assignment, AppError> {
    sqlx::query_as::<_, Assignment>(
        "INSERT INTO assignments (course_id, title, description, due_date, total_points, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, course_id, title, description, due_date, total_points, created_by, created_at",
    )
    .bind(req.course_id)
    .bind(req.title.trim())
    .bind(req.description.as_deref())
    .bind(req.due_date)
    .bind(req.total_points)
    .bind(req.created_by)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<Assignment>, AppError> {
    sqlx::query_as::<_, Assignment>(concat!(
        "SELECT ",
        assignment_columns!(),
        " FROM assignments a WHERE a.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn get(pool: &Pool<Postgres>, id: i64) -> Result<Assignment, AppError> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Assignment {id} not found")))
}

/// Assignments of a course, soonest due first; undated ones last.
pub async fn list_by_course(pool: &Pool<Postgres>, course_id: i64) -> Result<Vec<Assignment>, AppError> {
    sqlx::query_as::<_, Assignment>(concat!(
        "SELECT ",
        assignment_columns!(),
        " FROM assignments a WHERE a.course_id = $1",
        " ORDER BY a.due_date ASC NULLS LAST, a.id"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    #[sqlx(flatten)]
    assignment: Assignment,
    submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Every assignment in the student's courses with their latest submission time.
pub async fn progress_for_student(
    pool: &Pool<Postgres>,
    student_id: i64,
) -> Result<Vec<AssignmentProgress>, AppError> {
    let rows = sqlx::query_as::<_, ProgressRow>(concat!(
        "SELECT ",
        assignment_columns!(),
        ", (SELECT MAX(s.submitted_at) FROM submissions s",
        "   WHERE s.assignment_id = a.id AND s.student_id = $1) AS submitted_at",
        " FROM assignments a JOIN enrollments e ON e.course_id = a.course_id",
        " WHERE e.student_id = $1",
        " ORDER BY a.due_date ASC NULLS LAST, a.id"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows
        .into_iter()
        .map(|r| AssignmentProgress {
            submitted: r.submitted_at.is_some(),
            submitted_at: r.submitted_at,
            assignment: r.assignment,
        })
        .collect())
}
