use chrono::{DateTime, Utc};
use shared_types::AppError;
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// Persist the SHA-256 hash of a freshly issued refresh token.
pub async fn store(
    pool: &Pool<Postgres>,
    user_id: i64,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Revoke the token with this hash if it is still usable.
/// Returns false when it was unknown, expired or already revoked, which
/// makes each refresh token single-use even under concurrent requests.
pub async fn consume(pool: &Pool<Postgres>, user_id: i64, token_hash: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked = TRUE \
         WHERE token_hash = $1 AND user_id = $2 AND NOT revoked AND expires_at > NOW()",
    )
    .bind(token_hash)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected() == 1)
}

pub async fn is_active(pool: &Pool<Postgres>, user_id: i64, token_hash: &str) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM refresh_tokens \
         WHERE token_hash = $1 AND user_id = $2 AND NOT revoked AND expires_at > NOW())",
    )
    .bind(token_hash)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Drop tokens that expired or were revoked more than a day ago.
pub async fn purge_stale(pool: &Pool<Postgres>) -> Result<u64, AppError> {
    let result = sqlx::query(
        "DELETE FROM refresh_tokens \
         WHERE expires_at < NOW() - INTERVAL '1 day' \
            OR (revoked AND created_at < NOW() - INTERVAL '1 day')",
    )
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}
