//! Read-visibility rules. Staff read everything; a student reads only their
//! own records; a parent reads only the students linked to them.

use shared_types::{AppError, UserRole};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::caller_role;
use crate::auth::jwt::Claims;
use crate::repo;

/// Which students' records a read may cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentScope {
    All,
    Only(Vec<i64>),
}

impl StudentScope {
    pub fn ids(&self) -> Option<&[i64]> {
        match self {
            StudentScope::All => None,
            StudentScope::Only(ids) => Some(ids),
        }
    }

    /// The single student to filter on, `None` for everyone.
    /// Callers only use this with scopes of at most one id.
    pub fn single(&self) -> Option<i64> {
        self.ids().and_then(|ids| ids.first().copied())
    }
}

fn not_yours() -> AppError {
    AppError::forbidden("You do not have access to this student's records")
}

/// 403 unless the caller may read `student_id`'s records.
pub async fn ensure_can_view_student(
    pool: &Pool<Postgres>,
    claims: &Claims,
    student_id: i64,
) -> Result<(), AppError> {
    match caller_role(claims)? {
        UserRole::Director | UserRole::Teacher => Ok(()),
        UserRole::Student if claims.sub == student_id => Ok(()),
        UserRole::Parent if repo::parent::is_linked(pool, claims.sub, student_id).await? => Ok(()),
        _ => Err(not_yours()),
    }
}

/// Staff see every course; students see courses they are enrolled in;
/// parents see their children's courses.
pub async fn ensure_can_view_course(
    pool: &Pool<Postgres>,
    claims: &Claims,
    course_id: i64,
) -> Result<(), AppError> {
    let allowed = match caller_role(claims)? {
        UserRole::Director | UserRole::Teacher => true,
        UserRole::Student => repo::enrollment::is_enrolled(pool, claims.sub, course_id).await?,
        UserRole::Parent => {
            let children = repo::parent::student_ids(pool, claims.sub).await?;
            repo::enrollment::any_enrolled(pool, &children, course_id).await?
        }
        UserRole::CompanyAdmin => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden("You do not have access to this course"))
    }
}

/// A parent may list only their own children; staff may list anyone's.
pub fn ensure_can_view_parent(claims: &Claims, parent_id: i64) -> Result<(), AppError> {
    let role = caller_role(claims)?;
    if role.is_staff() || (role == UserRole::Parent && claims.sub == parent_id) {
        Ok(())
    } else {
        Err(AppError::forbidden("You can only view your own linked students"))
    }
}

/// 403 for callers that may not read student data at all.
pub fn ensure_staff(claims: &Claims) -> Result<UserRole, AppError> {
    let role = caller_role(claims)?;
    if role.is_staff() {
        Ok(role)
    } else {
        Err(AppError::forbidden("Only staff can view this information"))
    }
}

/// Resolve an optional `studentId` filter against the caller's visibility.
///
/// Staff get either everyone or the requested student. A student always gets
/// themself. A parent gets the requested student if linked, otherwise all of
/// their linked students.
pub async fn resolve_student_scope(
    pool: &Pool<Postgres>,
    claims: &Claims,
    requested: Option<i64>,
) -> Result<StudentScope, AppError> {
    match caller_role(claims)? {
        UserRole::Director | UserRole::Teacher => Ok(match requested {
            Some(id) => StudentScope::Only(vec![id]),
            None => StudentScope::All,
        }),
        UserRole::Student => match requested {
            Some(id) if id != claims.sub => Err(not_yours()),
            _ => Ok(StudentScope::Only(vec![claims.sub])),
        },
        UserRole::Parent => match requested {
            Some(id) => {
                ensure_can_view_student(pool, claims, id).await?;
                Ok(StudentScope::Only(vec![id]))
            }
            None => Ok(StudentScope::Only(
                repo::parent::student_ids(pool, claims.sub).await?,
            )),
        },
        UserRole::CompanyAdmin => Err(not_yours()),
    }
}
