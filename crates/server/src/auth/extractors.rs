use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::policy::{self, Action};
use shared_types::{AppError, UserRole};

use super::jwt::Claims;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
        // A token carrying a role we no longer recognize is treated as signed out.
        caller_role(&claims)?;
        Ok(AuthRequired(claims))
    }
}

/// Extractor that optionally extracts auth claims. Never fails.
pub struct MaybeAuth(pub Option<Claims>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<Claims>().cloned()))
    }
}

/// The caller's role; an unrecognized claim is a 401.
pub fn caller_role(claims: &Claims) -> Result<UserRole, AppError> {
    claims
        .user_role()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

/// 403 unless the role policy grants `action` to the caller.
pub fn require_action(claims: &Claims, action: Action) -> Result<(), AppError> {
    let role = caller_role(claims)?;
    if policy::policy_for(role).allows(action) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Your role is not allowed to {}",
            action.label().to_lowercase()
        )))
    }
}

/// Type-level name of a policy action, for use with [`Permitted`].
pub trait ActionMarker {
    const ACTION: Action;
}

macro_rules! action_markers {
    ($($name:ident),* $(,)?) => {
        /// Zero-sized markers naming each [`Action`] at the type level.
        pub mod actions {
            $(
                pub struct $name;

                impl super::ActionMarker for $name {
                    const ACTION: shared_types::policy::Action = shared_types::policy::Action::$name;
                }
            )*
        }
    };
}

action_markers!(
    AddStudent,
    AddTeacher,
    CreateCourse,
    CreateAssignment,
    RecordAttendance,
    SubmitAssignment,
    ViewSubmissions,
    RecordMemorization,
    CreateEvent,
    ManageGuardians,
    ViewAnalytics,
);

/// Extractor that requires authentication AND a policy action.
/// Returns 401 if unauthenticated, 403 if the caller's role lacks the action.
pub struct Permitted<A: ActionMarker>(pub Claims, PhantomData<A>);

impl<A: ActionMarker> Permitted<A> {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<A: ActionMarker, S: Send + Sync> FromRequestParts<S> for Permitted<A> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthRequired(claims) = AuthRequired::from_request_parts(parts, state).await?;
        require_action(&claims, A::ACTION)?;
        Ok(Permitted(claims, PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::AppErrorKind;

    fn claims(role: &str) -> Claims {
        Claims {
            sub: 1,
            username: "user".into(),
            role: role.into(),
            exp: 0,
            iat: 0,
            jti: None,
            typ: "access".into(),
        }
    }

    #[test]
    fn director_may_add_teacher() {
        assert!(require_action(&claims("director"), Action::AddTeacher).is_ok());
    }

    #[test]
    fn teacher_may_not_add_teacher() {
        let err = require_action(&claims("teacher"), Action::AddTeacher).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    #[test]
    fn parent_is_view_only() {
        for action in [
            Action::CreateCourse,
            Action::CreateAssignment,
            Action::SubmitAssignment,
            Action::RecordAttendance,
        ] {
            assert!(require_action(&claims("parent"), action).is_err());
        }
    }

    #[test]
    fn unknown_role_is_unauthorized() {
        let err = require_action(&claims("superuser"), Action::AddStudent).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Unauthorized);
    }

    #[test]
    fn marker_names_its_action() {
        assert_eq!(
            <actions::RecordMemorization as ActionMarker>::ACTION,
            Action::RecordMemorization
        );
    }
}
