use shared_types::{AppError, LinkStudentRequest, ParentStudentRelation, User};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

pub async fn link(
    pool: &Pool<Postgres>,
    parent_id: i64,
    req: &LinkStudentRequest,
) -> Result<ParentStudentRelation, AppError> {
    sqlx::query_as::<_, ParentStudentRelation>(
        "INSERT INTO parent_student_relations (parent_id, student_id, relationship, is_primary) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, parent_id, student_id, relationship, is_primary, created_at",
    )
    .bind(parent_id)
    .bind(req.student_id)
    .bind(req.relationship.trim())
    .bind(req.is_primary)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn is_linked(pool: &Pool<Postgres>, parent_id: i64, student_id: i64) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM parent_student_relations WHERE parent_id = $1 AND student_id = $2)",
    )
    .bind(parent_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn student_ids(pool: &Pool<Postgres>, parent_id: i64) -> Result<Vec<i64>, AppError> {
    sqlx::query_scalar::<_, i64>(
        "SELECT student_id FROM parent_student_relations WHERE parent_id = $1 ORDER BY student_id",
    )
    .bind(parent_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Linked students, primary links first.
pub async fn list_students(pool: &Pool<Postgres>, parent_id: i64) -> Result<Vec<User>, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT u.id, u.username, u.full_name, u.role, u.email, u.profile_picture, u.is_active, u.created_at \
         FROM parent_student_relations r JOIN users u ON u.id = r.student_id \
         WHERE r.parent_id = $1 \
         ORDER BY r.is_primary DESC, u.full_name, u.id",
    )
    .bind(parent_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
