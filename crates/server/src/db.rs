use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::storage::SubmissionStore;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<PgPool>` or
/// `State<Arc<SubmissionStore>>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub store: Arc<SubmissionStore>,
}

/// Pool created lazily; no connections are opened until the first query.
/// Each `#[tokio::test]` creates its own runtime, so the pool must not bind
/// to one at init time.
static POOL: OnceLock<Pool<Postgres>> = OnceLock::new();
static MIGRATED: AtomicBool = AtomicBool::new(false);
static STORE: OnceLock<Arc<SubmissionStore>> = OnceLock::new();

/// Create a new database connection pool from environment variables.
pub fn create_pool() -> Result<Pool<Postgres>, String> {
    // Load .env file if present (ignored in production where env vars are set directly).
    let _ = dotenvy::dotenv();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
        .map_err(|e| format!("Failed to create database pool: {e}"))
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Get or initialize the database connection pool.
/// Migrations run once on the first call; subsequent calls return immediately.
///
/// Used by Dioxus server functions, which share a single long-lived runtime.
/// REST handlers use `State<PgPool>` from `AppState` instead.
pub async fn get_db() -> &'static Pool<Postgres> {
    let pool = POOL.get_or_init(|| match create_pool() {
        Ok(pool) => pool,
        Err(e) => panic!("{e}"),
    });

    if !MIGRATED.swap(true, Ordering::SeqCst) {
        if let Err(e) = run_migrations(pool).await {
            tracing::error!(error = %e, "Database migrations failed");
        }
    }

    pool
}

/// Process-wide submission store, selected from the feature flags on first use.
pub fn get_store() -> Arc<SubmissionStore> {
    STORE
        .get_or_init(|| {
            let store = SubmissionStore::from_env().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "S3 store unavailable, using local uploads");
                SubmissionStore::Local(crate::storage::LocalObjectStore::from_env())
            });
            Arc::new(store)
        })
        .clone()
}
