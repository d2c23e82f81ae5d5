//! Route guard decision, independent of any UI framework.

use crate::models::{AuthUser, UserRole};
use crate::policy::{policy_for, LOGIN_PATH};

/// How long the denial message stays up before the forbidden redirect.
pub const FORBIDDEN_REDIRECT_DELAY_MS: u64 = 1500;

/// What is known about the caller's session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionStatus<'a> {
    /// Session lookup still in flight.
    Loading,
    SignedOut,
    SignedIn(&'a AuthUser),
}

impl<'a> SessionStatus<'a> {
    /// Build from the `Option<Result<Option<AuthUser>, _>>` shape a server
    /// future exposes: `None` is still loading and errors count as signed out.
    pub fn from_lookup<E>(lookup: Option<&'a Result<Option<AuthUser>, E>>) -> Self {
        match lookup {
            None => SessionStatus::Loading,
            Some(Ok(Some(user))) => SessionStatus::SignedIn(user),
            Some(Ok(None)) | Some(Err(_)) => SessionStatus::SignedOut,
        }
    }
}

/// Outcome of guarding one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Loading,
    /// No user, or a user whose role is not recognized.
    Unauthenticated { redirect_to: &'static str },
    /// Signed in, but the route does not admit this role.
    Forbidden { redirect_to: &'static str },
    Authorized(UserRole),
}

/// Decide what a protected route renders.
///
/// `allowed` is the route's role allow-list; `None` admits every recognized role.
/// The decision depends only on the resolved session and the allow-list.
pub fn evaluate(session: SessionStatus<'_>, allowed: Option<&[UserRole]>) -> GuardOutcome {
    let user = match session {
        SessionStatus::Loading => return GuardOutcome::Loading,
        SessionStatus::SignedOut => {
            return GuardOutcome::Unauthenticated {
                redirect_to: LOGIN_PATH,
            }
        }
        SessionStatus::SignedIn(user) => user,
    };

    let Some(role) = user.role() else {
        return GuardOutcome::Unauthenticated {
            redirect_to: LOGIN_PATH,
        };
    };

    match allowed {
        Some(roles) if !roles.contains(&role) => GuardOutcome::Forbidden {
            redirect_to: policy_for(role).landing_path,
        },
        _ => GuardOutcome::Authorized(role),
    }
}
