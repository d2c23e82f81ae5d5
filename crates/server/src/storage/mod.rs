//! Object storage for assignment submission files.
//!
//! Files go to S3 when the `s3` feature flag is on and to a local
//! directory otherwise. Both backends use the same key layout:
//! `submissions/{assignment_id}/{student_id}/{uuid}-{file_name}`.

mod local;
mod s3;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// Read an env var, trying the primary name first then a fallback.
pub fn env_or(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .ok()
        .or_else(|| std::env::var(fallback).ok())
}

/// Object storage operations for submission files.
#[allow(async_fn_in_trait)]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under `key`, replacing any existing object.
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String>;

    /// Download the bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, String>;

    /// Check if an object exists.
    async fn head(&self, key: &str) -> Result<bool, String>;

    /// Delete an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), String>;
}

/// The store selected at startup.
pub enum SubmissionStore {
    S3(S3ObjectStore),
    Local(LocalObjectStore),
}

impl SubmissionStore {
    /// S3 when the `s3` flag is on, else the local upload directory.
    pub fn from_env() -> Result<Self, String> {
        if crate::config::feature_flags().s3 {
            Ok(SubmissionStore::S3(S3ObjectStore::from_env()?))
        } else {
            Ok(SubmissionStore::Local(LocalObjectStore::from_env()))
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            SubmissionStore::S3(_) => "s3",
            SubmissionStore::Local(_) => "local",
        }
    }

    /// Create the bucket or directory if it does not exist yet.
    pub async fn prepare(&self) {
        match self {
            SubmissionStore::S3(s) => s.ensure_bucket().await,
            SubmissionStore::Local(l) => l.ensure_root().await,
        }
    }
}

impl ObjectStore for SubmissionStore {
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String> {
        match self {
            SubmissionStore::S3(s) => s.put(key, content_type, body).await,
            SubmissionStore::Local(l) => l.put(key, content_type, body).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        match self {
            SubmissionStore::S3(s) => s.get(key).await,
            SubmissionStore::Local(l) => l.get(key).await,
        }
    }

    async fn head(&self, key: &str) -> Result<bool, String> {
        match self {
            SubmissionStore::S3(s) => s.head(key).await,
            SubmissionStore::Local(l) => l.head(key).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        match self {
            SubmissionStore::S3(s) => s.delete(key).await,
            SubmissionStore::Local(l) => l.delete(key).await,
        }
    }
}

/// Reduce a client-supplied file name to a safe single path segment.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.chars().take(120).collect()
    }
}

/// Storage key for a new submission file.
pub fn submission_key(assignment_id: i64, student_id: i64, file_name: &str) -> String {
    format!(
        "submissions/{assignment_id}/{student_id}/{}-{}",
        uuid::Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}
