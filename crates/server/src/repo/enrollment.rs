use shared_types::{AppError, Enrollment, User};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// Enroll a student. A second enrollment in the same course is a 409.
pub async fn create(pool: &Pool<Postgres>, student_id: i64, course_id: i64) -> Result<Enrollment, AppError> {
    sqlx::query_as::<_, Enrollment>(
        "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) \
         RETURNING id, student_id, course_id, enrollment_date",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn is_enrolled(pool: &Pool<Postgres>, student_id: i64, course_id: i64) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// True when at least one of `student_ids` is enrolled in the course.
pub async fn any_enrolled(pool: &Pool<Postgres>, student_ids: &[i64], course_id: i64) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM enrollments WHERE student_id = ANY($1) AND course_id = $2)",
    )
    .bind(student_ids)
    .bind(course_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Students enrolled in a course, by name.
pub async fn list_students(pool: &Pool<Postgres>, course_id: i64) -> Result<Vec<User>, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.full_name, u.role, u.email, u.profile_picture, \
                u.is_active, u.created_at \
         FROM users u JOIN enrollments e ON e.student_id = u.id \
         WHERE e.course_id = $1 ORDER BY u.full_name, u.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
