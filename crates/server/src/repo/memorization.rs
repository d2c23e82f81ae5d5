use shared_types::{AppError, CreateMemorizationRequest, Memorization};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

macro_rules! memorization_columns {
    () => {
        "id, student_id, course_id, surah, ayah_start, ayah_end, completion_date, progress, is_completed"
    };
}

pub async fn create(pool: &Pool<Postgres>, req: &CreateMemorizationRequest) -> Result<Memorization, AppError> {
    sqlx::query_as::<_, Memorization>(concat!(
        "INSERT INTO memorizations",
        " (student_id, course_id, surah, ayah_start, ayah_end, completion_date, progress, is_completed)",
        " VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING ",
        memorization_columns!()
    ))
    .bind(req.student_id)
    .bind(req.course_id)
    .bind(req.surah.trim())
    .bind(req.ayah_start)
    .bind(req.ayah_end)
    .bind(req.completion_date)
    .bind(req.progress)
    .bind(req.is_completed)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn get(pool: &Pool<Postgres>, id: i64) -> Result<Memorization, AppError> {
    sqlx::query_as::<_, Memorization>(concat!(
        "SELECT ",
        memorization_columns!(),
        " FROM memorizations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?
    .ok_or_else(|| AppError::not_found(format!("Memorization entry {id} not found")))
}

/// Persist an entry already merged by `UpdateMemorizationRequest::apply`.
pub async fn update(pool: &Pool<Postgres>, entry: &Memorization) -> Result<Memorization, AppError> {
    sqlx::query_as::<_, Memorization>(concat!(
        "UPDATE memorizations SET surah = $2, ayah_start = $3, ayah_end = $4,",
        " completion_date = $5, progress = $6, is_completed = $7",
        " WHERE id = $1 RETURNING ",
        memorization_columns!()
    ))
    .bind(entry.id)
    .bind(&entry.surah)
    .bind(entry.ayah_start)
    .bind(entry.ayah_end)
    .bind(entry.completion_date)
    .bind(entry.progress)
    .bind(entry.is_completed)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?
    .ok_or_else(|| AppError::not_found(format!("Memorization entry {} not found", entry.id)))
}

/// Entries for the given students; `None` lists every entry.
pub async fn list_for_students(
    pool: &Pool<Postgres>,
    student_ids: Option<&[i64]>,
) -> Result<Vec<Memorization>, AppError> {
    sqlx::query_as::<_, Memorization>(concat!(
        "SELECT ",
        memorization_columns!(),
        " FROM memorizations WHERE ($1::BIGINT[] IS NULL OR student_id = ANY($1))",
        " ORDER BY student_id, created_at DESC, id DESC"
    ))
    .bind(student_ids)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
