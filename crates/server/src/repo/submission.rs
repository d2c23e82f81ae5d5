use shared_types::{AppError, Submission};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

macro_rules! submission_columns {
    () => {
        "id, assignment_id, student_id, file_name, content_type, storage_key, file_size, comments, submitted_at"
    };
}

pub struct NewSubmission<'a> {
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub storage_key: &'a str,
    pub file_size: i64,
    pub comments: Option<&'a str>,
}

pub async fn create(pool: &Pool<Postgres>, new: NewSubmission<'_>) -> Result<Submission, AppError> {
    sqlx::query_as::<_, Submission>(concat!(
        "INSERT INTO submissions",
        " (assignment_id, student_id, file_name, content_type, storage_key, file_size, comments)",
        " VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING ",
        submission_columns!()
    ))
    .bind(new.assignment_id)
    .bind(new.student_id)
    .bind(new.file_name)
    .bind(new.content_type)
    .bind(new.storage_key)
    .bind(new.file_size)
    .bind(new.comments.map(str::trim).filter(|c| !c.is_empty()))
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(concat!(
        "SELECT ",
        submission_columns!(),
        " FROM submissions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Submissions for one assignment, newest first.
pub async fn list_by_assignment(pool: &Pool<Postgres>, assignment_id: i64) -> Result<Vec<Submission>, AppError> {
    sqlx::query_as::<_, Submission>(concat!(
        "SELECT ",
        submission_columns!(),
        " FROM submissions WHERE assignment_id = $1 ORDER BY submitted_at DESC, id DESC"
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
