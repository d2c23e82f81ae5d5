use chrono::NaiveDate;
use shared_types::{AppError, Course};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

macro_rules! course_columns {
    () => {
        "c.id, c.name, c.description, c.start_date, c.end_date, c.teacher_id, c.created_at"
    };
}

pub async fn create(
    pool: &Pool<Postgres>,
    name: &str,
    description: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    teacher_id: i64,
) -> Result<Course, AppError> {
    sqlx::query_as::<_, Course>(
        "INSERT INTO courses (name, description, start_date, end_date, teacher_id) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, description, start_date, end_date, teacher_id, created_at",
    )
    .bind(name.trim())
    .bind(description)
    .bind(start_date)
    .bind(end_date)
    .bind(teacher_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<Course>, AppError> {
    sqlx::query_as::<_, Course>(concat!("SELECT ", course_columns!(), " FROM courses c WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn get(pool: &Pool<Postgres>, id: i64) -> Result<Course, AppError> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Course {id} not found")))
}

pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<Course>, AppError> {
    sqlx::query_as::<_, Course>(concat!("SELECT ", course_columns!(), " FROM courses c ORDER BY c.name, c.id"))
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Courses any of the given students is enrolled in.
pub async fn list_for_students(
    pool: &Pool<Postgres>,
    student_ids: &[i64],
) -> Result<Vec<Course>, AppError> {
    sqlx::query_as::<_, Course>(concat!(
        "SELECT DISTINCT ",
        course_columns!(),
        " FROM courses c JOIN enrollments e ON e.course_id = c.id",
        " WHERE e.student_id = ANY($1) ORDER BY c.name, c.id"
    ))
    .bind(student_ids)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
