use shared_types::policy::Action;
use shared_types::{
    AppError, Course, CreateCourseRequest, CreateLessonRequest, EnrollRequest, Enrollment, Lesson, User, UserRole,
};
use sqlx::{Pool, Postgres};

use crate::access;
use crate::auth::extractors::{caller_role, require_action};
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// Courses visible to the caller: a student's enrollments, a parent's
/// children's enrollments, everything for staff.
pub async fn list(pool: &Pool<Postgres>, claims: &Claims) -> Result<Vec<Course>, AppError> {
    match caller_role(claims)? {
        UserRole::Student => repo::course::list_for_students(pool, &[claims.sub]).await,
        UserRole::Parent => {
            let children = repo::parent::student_ids(pool, claims.sub).await?;
            repo::course::list_for_students(pool, &children).await
        }
        UserRole::Director | UserRole::Teacher | UserRole::CompanyAdmin => repo::course::list_all(pool).await,
    }
}

pub async fn get(pool: &Pool<Postgres>, claims: &Claims, id: i64) -> Result<Course, AppError> {
    access::ensure_can_view_course(pool, claims, id).await?;
    repo::course::get(pool, id).await
}

/// A teacher creating a course teaches it unless they name someone else;
/// a director must name the teacher.
#[tracing::instrument(skip(pool, req), fields(name = %req.name))]
pub async fn create(pool: &Pool<Postgres>, claims: &Claims, req: &CreateCourseRequest) -> Result<Course, AppError> {
    require_action(claims, Action::CreateCourse)?;
    req.validate_request()?;
    req.check_dates()?;

    let teacher_id = match (req.teacher_id, caller_role(claims)?) {
        (Some(id), UserRole::Teacher) if id != claims.sub => {
            return Err(AppError::forbidden("Teachers can only create their own courses"))
        }
        (Some(id), _) => id,
        (None, UserRole::Teacher) => claims.sub,
        (None, _) => return Err(AppError::field("teacher_id", "Choose the teacher for this course")),
    };
    repo::user::find_with_role(pool, teacher_id, UserRole::Teacher)
        .await
        .map_err(|_| AppError::field("teacher_id", "The selected teacher does not exist"))?;

    let course = repo::course::create(
        pool,
        &req.name,
        req.description.as_deref(),
        req.start_date,
        req.end_date,
        teacher_id,
    )
    .await?;
    tracing::info!(course_id = course.id, teacher_id, "Course created");
    Ok(course)
}

pub async fn lessons(pool: &Pool<Postgres>, claims: &Claims, course_id: i64) -> Result<Vec<Lesson>, AppError> {
    get(pool, claims, course_id).await?;
    repo::lesson::list_by_course(pool, course_id).await
}

pub async fn create_lesson(pool: &Pool<Postgres>, claims: &Claims, req: &CreateLessonRequest) -> Result<Lesson, AppError> {
    require_action(claims, Action::CreateCourse)?;
    req.validate_request()?;
    repo::course::get(pool, req.course_id).await?;
    repo::lesson::create(pool, req).await
}

#[tracing::instrument(skip(pool))]
pub async fn enroll(pool: &Pool<Postgres>, claims: &Claims, req: &EnrollRequest) -> Result<Enrollment, AppError> {
    require_action(claims, Action::AddStudent)?;
    repo::course::get(pool, req.course_id).await?;
    repo::user::find_with_role(pool, req.student_id, UserRole::Student).await?;
    repo::enrollment::create(pool, req.student_id, req.course_id).await
}

/// Class roster, staff only.
pub async fn students(pool: &Pool<Postgres>, claims: &Claims, course_id: i64) -> Result<Vec<User>, AppError> {
    access::ensure_staff(claims)?;
    repo::course::get(pool, course_id).await?;
    repo::enrollment::list_students(pool, course_id).await
}
