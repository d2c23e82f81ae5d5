use shared_types::{AppError, User, UserRole};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

macro_rules! user_columns {
    () => {
        "id, username, full_name, role, email, profile_picture, is_active, created_at"
    };
}

/// A user row together with its password hash, for login only.
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub email: Option<&'a str>,
    pub role: UserRole,
}

pub async fn create(pool: &Pool<Postgres>, new: NewUser<'_>) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(concat!(
        "INSERT INTO users (username, password_hash, full_name, email, role) ",
        "VALUES ($1, $2, $3, $4, $5) RETURNING ",
        user_columns!()
    ))
    .bind(new.username.trim())
    .bind(new.password_hash)
    .bind(new.full_name.trim())
    .bind(new.email.map(str::trim).filter(|e| !e.is_empty()))
    .bind(new.role.as_str())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(concat!("SELECT ", user_columns!(), " FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Load a user and require a particular role, e.g. when linking a student.
pub async fn find_with_role(
    pool: &Pool<Postgres>,
    id: i64,
    role: UserRole,
) -> Result<User, AppError> {
    let user = find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    if user.role != role.as_str() {
        return Err(AppError::bad_request(format!(
            "User {id} is not a {}",
            role.label().to_lowercase()
        )));
    }
    Ok(user)
}

/// Case-insensitive username lookup including the password hash.
pub async fn find_credentials(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<UserCredentials>, AppError> {
    sqlx::query_as::<_, UserCredentials>(concat!(
        "SELECT ",
        user_columns!(),
        ", password_hash FROM users WHERE LOWER(username) = LOWER($1)"
    ))
    .bind(username.trim())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// All users, optionally limited to one role, ordered by name.
pub async fn list(pool: &Pool<Postgres>, role: Option<UserRole>) -> Result<Vec<User>, AppError> {
    sqlx::query_as::<_, User>(concat!(
        "SELECT ",
        user_columns!(),
        " FROM users WHERE ($1::TEXT IS NULL OR role = $1) ORDER BY full_name, id"
    ))
    .bind(role.map(|r| r.as_str()))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn count_by_role(pool: &Pool<Postgres>, role: UserRole) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(role.as_str())
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
