use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::ObjectStore;

/// Stores objects as files under a root directory (`UPLOAD_DIR`).
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            tracing::warn!(root = %self.root.display(), error = %e, "Failed to create upload directory");
        }
    }

    /// Resolve a key below the root; keys that try to climb out are rejected.
    fn path_for(&self, key: &str) -> Result<PathBuf, String> {
        let rel = Path::new(key);
        if key.is_empty() || rel.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(format!("Invalid object key: {key}"));
        }
        Ok(self.root.join(rel))
    }
}

impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, _content_type: &str, body: Vec<u8>) -> Result<(), String> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| format!("Failed to write {key}: {e}"))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {key}: {e}"))
    }

    async fn head(&self, key: &str) -> Result<bool, String> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| format!("HEAD failed for {key}: {e}"))
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("DELETE failed for {key}: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalObjectStore {
        let dir = std::env::temp_dir().join(format!("isp-store-{}", uuid::Uuid::new_v4()));
        LocalObjectStore::new(dir)
    }

    #[tokio::test]
    async fn put_get_delete() {
        let store = temp_store();
        let key = "submissions/1/2/abc-essay.txt";

        store.put(key, "text/plain", b"bismillah".to_vec()).await.unwrap();
        assert!(store.head(key).await.unwrap());
        assert_eq!(store.get(key).await.unwrap(), b"bismillah");

        store.delete(key).await.unwrap();
        assert!(!store.head(key).await.unwrap());
        // second delete is a no-op
        store.delete(key).await.unwrap();

        let _ = tokio::fs::remove_dir_all(store.root()).await;
    }

    #[tokio::test]
    async fn keys_cannot_escape_the_root() {
        let store = temp_store();
        assert!(store.put("../outside.txt", "text/plain", vec![1]).await.is_err());
        assert!(store.get("/etc/passwd").await.is_err());
        assert!(store.head("").await.is_err());
    }
}
