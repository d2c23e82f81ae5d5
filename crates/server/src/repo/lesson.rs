use shared_types::{AppError, CreateLessonRequest, Lesson};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// Insert a lesson. Without an explicit `order_index` it goes after the
/// course's current last lesson.
pub async fn create(pool: &Pool<Postgres>, req: &CreateLessonRequest) -> Result<Lesson, AppError> {
    sqlx::query_as::<_, Lesson>(
        "INSERT INTO lessons (course_id, title, description, content, order_index) \
         VALUES ($1, $2, $3, $4, COALESCE($5, \
             (SELECT COALESCE(MAX(order_index) + 1, 0) FROM lessons WHERE course_id = $1))) \
         RETURNING id, course_id, title, description, content, order_index, created_at",
    )
    .bind(req.course_id)
    .bind(req.title.trim())
    .bind(req.description.as_deref())
    .bind(req.content.as_deref())
    .bind(req.order_index)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Lessons of a course by `order_index`, ties broken by id.
pub async fn list_by_course(pool: &Pool<Postgres>, course_id: i64) -> Result<Vec<Lesson>, AppError> {
    sqlx::query_as::<_, Lesson>(
        "SELECT id, course_id, title, description, content, order_index, created_at \
         FROM lessons WHERE course_id = $1 ORDER BY order_index, id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
