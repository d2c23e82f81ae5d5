use shared_types::policy::Action;
use shared_types::{AppError, AttendanceStats, LinkStudentRequest, ParentStudentRelation, StudentProgress, User, UserRole};
use sqlx::{Pool, Postgres};

use crate::access;
use crate::auth::extractors::require_action;
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo;

pub async fn students(pool: &Pool<Postgres>, claims: &Claims, parent_id: i64) -> Result<Vec<User>, AppError> {
    access::ensure_can_view_parent(claims, parent_id)?;
    repo::parent::list_students(pool, parent_id).await
}

#[tracing::instrument(skip(pool, req), fields(student_id = req.student_id))]
pub async fn link(
    pool: &Pool<Postgres>,
    claims: &Claims,
    parent_id: i64,
    req: &LinkStudentRequest,
) -> Result<ParentStudentRelation, AppError> {
    require_action(claims, Action::ManageGuardians)?;
    req.validate_request()?;
    repo::user::find_with_role(pool, parent_id, UserRole::Parent).await?;
    repo::user::find_with_role(pool, req.student_id, UserRole::Student).await?;
    repo::parent::link(pool, parent_id, req).await
}

/// Everything the parent dashboard shows for one child.
pub async fn progress(pool: &Pool<Postgres>, claims: &Claims, student_id: i64) -> Result<StudentProgress, AppError> {
    access::ensure_can_view_student(pool, claims, student_id).await?;
    let student = repo::user::find_with_role(pool, student_id, UserRole::Student).await?;

    let courses = repo::course::list_for_students(pool, &[student_id]).await?;
    let counts = repo::attendance::counts_by_course(pool, None, Some(student_id)).await?;
    let memorization = repo::memorization::list_for_students(pool, Some(std::slice::from_ref(&student_id))).await?;
    let assignments = repo::assignment::progress_for_student(pool, student_id).await?;

    Ok(StudentProgress::build(
        student,
        courses,
        AttendanceStats::from_courses(&counts),
        memorization,
        assignments,
    ))
}
