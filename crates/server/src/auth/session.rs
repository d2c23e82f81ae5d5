//! Session lifecycle shared by the REST handlers, the server functions and
//! the auth middleware: password login, token issue, refresh rotation and
//! logout.

use shared_types::{AppError, AuthUser, CreateUserRequest, User, UserRole};
use sqlx::{Pool, Postgres};

use super::jwt::{self, Claims, TokenError};
use super::password;
use crate::repo;

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::internal(e.to_string())
    }
}

/// A freshly issued access/refresh pair.
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Sign both tokens for `user` and persist the refresh token hash.
pub async fn issue_session(pool: &Pool<Postgres>, user: &User) -> Result<SessionTokens, AppError> {
    let access_token = jwt::create_access_token(user.id, &user.username, &user.role)?;
    let (refresh_token, expires_at) =
        jwt::create_refresh_token(user.id, &user.username, &user.role)?;
    repo::refresh_token::store(pool, user.id, &jwt::hash_token(&refresh_token), expires_at).await?;
    Ok(SessionTokens {
        access_token,
        refresh_token,
    })
}

/// Check a username/password pair. Every failure reports the same message.
pub async fn authenticate(
    pool: &Pool<Postgres>,
    username: &str,
    password_attempt: &str,
) -> Result<User, AppError> {
    let invalid = || AppError::unauthorized("Invalid username or password");

    let Some(creds) = repo::user::find_credentials(pool, username).await? else {
        password::verify_against_dummy(password_attempt);
        return Err(invalid());
    };

    if !password::verify_password(password_attempt, &creds.password_hash)? {
        return Err(invalid());
    }
    if !creds.user.is_active {
        return Err(AppError::forbidden("This account has been disabled"));
    }
    if UserRole::parse(&creds.user.role).is_none() {
        return Err(invalid());
    }
    Ok(creds.user)
}

/// Hash the password and insert the account. Callers decide which roles
/// they may create.
pub async fn create_account(
    pool: &Pool<Postgres>,
    req: &CreateUserRequest,
    role: UserRole,
) -> Result<User, AppError> {
    let password_hash = password::hash_password(&req.password)?;
    repo::user::create(
        pool,
        repo::user::NewUser {
            username: &req.username,
            password_hash: &password_hash,
            full_name: &req.full_name,
            email: req.email.as_deref(),
            role,
        },
    )
    .await
}

/// Parse the requested role of a sign-up or staff-created account.
pub fn requested_role(req: &CreateUserRequest) -> Result<UserRole, AppError> {
    UserRole::parse(&req.role).ok_or_else(|| AppError::field("role", "Unknown role"))
}

/// Self-registration: only open when the `self_registration` flag is on,
/// and only for student and parent accounts.
pub async fn register(pool: &Pool<Postgres>, req: &CreateUserRequest) -> Result<User, AppError> {
    if !crate::config::feature_flags().self_registration {
        return Err(AppError::forbidden("Self-registration is disabled"));
    }
    let role = requested_role(req)?;
    if !matches!(role, UserRole::Student | UserRole::Parent) {
        return Err(AppError::field(
            "role",
            "Only student and parent accounts can self-register",
        ));
    }
    create_account(pool, req, role).await
}

/// Exchange a refresh token for a new pair. The old refresh token is
/// consumed, so replaying it fails. Returns `None` for any unusable token.
pub async fn rotate_refresh(
    pool: &Pool<Postgres>,
    refresh_token: &str,
) -> Option<(Claims, SessionTokens)> {
    let claims = jwt::validate_refresh_token(refresh_token).ok()?;
    let consumed = repo::refresh_token::consume(pool, claims.sub, &jwt::hash_token(refresh_token))
        .await
        .ok()?;
    if !consumed {
        return None;
    }

    // Re-read the user so a disabled account cannot keep refreshing.
    let user = repo::user::find_by_id(pool, claims.sub).await.ok()??;
    if !user.is_active {
        return None;
    }

    let tokens = issue_session(pool, &user).await.ok()?;
    let fresh = jwt::validate_access_token(&tokens.access_token).ok()?;
    Some((fresh, tokens))
}

/// Revoke the presented refresh token, if any, on logout.
pub async fn end_session(pool: &Pool<Postgres>, refresh_token: Option<&str>) -> Result<(), AppError> {
    let Some(token) = refresh_token else {
        return Ok(());
    };
    if let Ok(claims) = jwt::validate_refresh_token(token) {
        repo::refresh_token::consume(pool, claims.sub, &jwt::hash_token(token)).await?;
    }
    Ok(())
}

/// Load the signed-in user's profile. `None` when the account no longer
/// exists or is disabled.
pub async fn current_user(pool: &Pool<Postgres>, claims: &Claims) -> Result<Option<AuthUser>, AppError> {
    Ok(repo::user::find_by_id(pool, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .map(AuthUser::from))
}

/// Create the first director from `BOOTSTRAP_DIRECTOR_USERNAME` and
/// `BOOTSTRAP_DIRECTOR_PASSWORD` when the school has none yet.
pub async fn bootstrap_director(pool: &Pool<Postgres>) -> Result<(), AppError> {
    let (Ok(username), Ok(password)) = (
        std::env::var("BOOTSTRAP_DIRECTOR_USERNAME"),
        std::env::var("BOOTSTRAP_DIRECTOR_PASSWORD"),
    ) else {
        return Ok(());
    };

    if repo::user::count_by_role(pool, UserRole::Director).await? > 0 {
        return Ok(());
    }

    let req = CreateUserRequest {
        full_name: std::env::var("BOOTSTRAP_DIRECTOR_NAME").unwrap_or_else(|_| "Director".into()),
        username,
        password,
        email: None,
        role: UserRole::Director.as_str().to_string(),
    };
    let user = create_account(pool, &req, UserRole::Director).await?;
    tracing::info!(user_id = user.id, username = %user.username, "Bootstrapped director account");
    Ok(())
}
