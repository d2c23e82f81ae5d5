use dioxus::prelude::*;
use shared_types::policy::{policy_for, Action, RolePolicy};
use shared_types::{AuthUser, UserRole};

/// Global authentication state, provided once in `App` and read by the
/// guard, the navigation shell and any view that needs the caller's identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthState {
    pub current_user: Signal<Option<AuthUser>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            current_user: Signal::new(None),
        }
    }

    pub fn set_user(&mut self, user: AuthUser) {
        self.current_user.set(Some(user));
    }

    pub fn clear_auth(&mut self) {
        self.current_user.set(None);
    }

    /// The caller's role; `None` when signed out or the role is unrecognized.
    pub fn role(&self) -> Option<UserRole> {
        self.current_user.read().as_ref().and_then(AuthUser::role)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.current_user.read().as_ref().map(|u| u.id)
    }

    pub fn policy(&self) -> Option<&'static RolePolicy> {
        self.role().map(policy_for)
    }

    pub fn can(&self, action: Action) -> bool {
        self.policy().is_some_and(|p| p.allows(action))
    }
}

/// Hook to access auth state.
pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}

/// Sign out on the server, drop every cached query and go to the login page.
pub async fn sign_out(mut auth: AuthState, mut cache: crate::query::QueryCache) {
    if let Err(e) = server::api::logout().await {
        tracing::warn!(error = %e, "Logout request failed");
    }
    auth.clear_auth();
    cache.clear();
    navigator().push(crate::routes::Route::Login { redirect: None });
}
