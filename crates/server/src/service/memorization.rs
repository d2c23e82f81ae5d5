use shared_types::policy::Action;
use shared_types::{
    AppError, CreateMemorizationRequest, Memorization, MemorizationStats, UpdateMemorizationRequest, UserRole,
};
use sqlx::{Pool, Postgres};

use crate::access;
use crate::auth::extractors::require_action;
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo;

pub async fn list(pool: &Pool<Postgres>, claims: &Claims, student_id: Option<i64>) -> Result<Vec<Memorization>, AppError> {
    let scope = access::resolve_student_scope(pool, claims, student_id).await?;
    repo::memorization::list_for_students(pool, scope.ids()).await
}

pub async fn stats(pool: &Pool<Postgres>, claims: &Claims, student_id: Option<i64>) -> Result<MemorizationStats, AppError> {
    let entries = list(pool, claims, student_id).await?;
    Ok(MemorizationStats::from_entries(&entries))
}

#[tracing::instrument(skip(pool, req), fields(student_id = req.student_id, surah = %req.surah))]
pub async fn create(pool: &Pool<Postgres>, claims: &Claims, req: &CreateMemorizationRequest) -> Result<Memorization, AppError> {
    require_action(claims, Action::RecordMemorization)?;
    req.validate_request()?;
    req.check_ayahs()?;
    repo::user::find_with_role(pool, req.student_id, UserRole::Student).await?;
    if !repo::enrollment::is_enrolled(pool, req.student_id, req.course_id).await? {
        return Err(AppError::field("course_id", "The student is not enrolled in this course"));
    }
    repo::memorization::create(pool, req).await
}

#[tracing::instrument(skip(pool, req))]
pub async fn update(
    pool: &Pool<Postgres>,
    claims: &Claims,
    id: i64,
    req: &UpdateMemorizationRequest,
) -> Result<Memorization, AppError> {
    require_action(claims, Action::RecordMemorization)?;
    req.validate_request()?;
    let current = repo::memorization::get(pool, id).await?;
    let next = req.apply(&current)?;
    repo::memorization::update(pool, &next).await
}
