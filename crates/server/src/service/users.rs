use shared_types::policy::Action;
use shared_types::{AppError, CreateUserRequest, User, UserRole};
use sqlx::{Pool, Postgres};

use crate::access;
use crate::auth::extractors::require_action;
use crate::auth::jwt::Claims;
use crate::auth::session;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// Which policy action creating an account of `role` needs.
pub fn action_for_new_role(role: UserRole) -> Action {
    match role {
        UserRole::Student | UserRole::Parent => Action::AddStudent,
        UserRole::Teacher | UserRole::Director | UserRole::CompanyAdmin => Action::AddTeacher,
    }
}

/// Staff-only directory listing, optionally filtered by role.
pub async fn list(pool: &Pool<Postgres>, claims: &Claims, role: Option<&str>) -> Result<Vec<User>, AppError> {
    access::ensure_staff(claims)?;
    let role = match role.filter(|r| !r.trim().is_empty()) {
        Some(r) => Some(UserRole::parse(r).ok_or_else(|| AppError::bad_request(format!("Unknown role: {r}")))?),
        None => None,
    };
    repo::user::list(pool, role).await
}

/// Staff create accounts: students and parents need AddStudent, every
/// other role needs AddTeacher.
#[tracing::instrument(skip(pool, req), fields(username = %req.username, role = %req.role))]
pub async fn create(pool: &Pool<Postgres>, claims: &Claims, req: &CreateUserRequest) -> Result<User, AppError> {
    req.validate_request()?;
    let role = session::requested_role(req)?;
    require_action(claims, action_for_new_role(role))?;
    let user = session::create_account(pool, req, role).await?;
    tracing::info!(user_id = user.id, created_by = claims.sub, "Account created");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guardians_are_added_with_students() {
        assert_eq!(action_for_new_role(UserRole::Student), Action::AddStudent);
        assert_eq!(action_for_new_role(UserRole::Parent), Action::AddStudent);
    }

    #[test]
    fn staff_accounts_need_add_teacher() {
        for role in [UserRole::Teacher, UserRole::Director, UserRole::CompanyAdmin] {
            assert_eq!(action_for_new_role(role), Action::AddTeacher);
        }
    }
}
