use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::ServerSideEncryption,
    Client,
};

use super::{env_or, ObjectStore};

/// Bucket name for submission files (from env or default).
fn submissions_bucket() -> String {
    std::env::var("SUBMISSIONS_BUCKET").unwrap_or_else(|_| "submissions".to_string())
}

/// S3-compatible object store (AWS, MinIO, Tigris).
/// All uploads are encrypted with SSE-S3 (AES256).
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build from `AWS_*` variables, falling back to the `S3_*` names used
    /// for local MinIO.
    pub fn from_env() -> Result<Self, String> {
        let endpoint = env_or("AWS_ENDPOINT_URL_S3", "S3_ENDPOINT")
            .ok_or("AWS_ENDPOINT_URL_S3 or S3_ENDPOINT must be set")?;
        let access_key = env_or("AWS_ACCESS_KEY_ID", "S3_ACCESS_KEY")
            .ok_or("AWS_ACCESS_KEY_ID or S3_ACCESS_KEY must be set")?;
        let secret_key = env_or("AWS_SECRET_ACCESS_KEY", "S3_SECRET_KEY")
            .ok_or("AWS_SECRET_ACCESS_KEY or S3_SECRET_KEY must be set")?;
        let region =
            env_or("AWS_REGION", "S3_REGION").unwrap_or_else(|| "us-east-1".to_string());

        let creds = Credentials::new(&access_key, &secret_key, None, None, "env");

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(&endpoint)
            .region(Region::new(region))
            .credentials_provider(creds)
            .force_path_style(true)
            .behavior_version_latest()
            .build();

        Ok(Self {
            client: Client::from_conf(config),
            bucket: submissions_bucket(),
        })
    }

    /// Ensure the submissions bucket exists (private, no bucket policy).
    pub async fn ensure_bucket(&self) {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok();

        if !exists {
            tracing::info!(bucket = %self.bucket, "Creating submissions bucket");
            if let Err(e) = self.client.create_bucket().bucket(&self.bucket).send().await {
                tracing::warn!(bucket = %self.bucket, error = %e, "Failed to create submissions bucket");
            }
        }
    }
}

impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<(), String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let svc = e.into_service_error();
                tracing::error!(key, "S3 PutObject failed: {:?}", svc);
                format!("S3 upload failed: {svc}")
            })?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, String> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let svc = e.into_service_error();
                tracing::error!(key, "S3 GetObject failed: {:?}", svc);
                format!("S3 download failed: {svc}")
            })?;

        resp.body
            .collect()
            .await
            .map(|data| data.into_bytes().to_vec())
            .map_err(|e| format!("Failed to read S3 response body: {e}"))
    }

    async fn head(&self, key: &str) -> Result<bool, String> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let svc_err = e.into_service_error();
                if svc_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(format!("HEAD failed: {svc_err}"))
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| format!("DELETE failed: {e}"))?;
        Ok(())
    }
}
