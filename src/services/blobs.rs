//! Blob store: file bytes behind public URLs.
//!
//! `HttpBlobStore` talks to a Supabase-style storage REST API:
//!
//! | Call | Request |
//! |------|---------|
//! | upload | `POST {base}/storage/v1/object/{bucket}/{path}` with the raw bytes |
//! | remove | `DELETE {base}/storage/v1/object/{bucket}` with `{"prefixes": [name]}` |
//! | public URL | `{base}/storage/v1/object/public/{bucket}/{path}` (no request) |
//!
//! Uploaded paths are `"{unix_millis}-{file_name}"` so repeated drops of the
//! same file never collide. The file name is reduced to URL-safe characters,
//! which keeps the last segment of the public URL equal to the object name.

use std::time::Duration;

use reqwest::Url;
use time::OffsetDateTime;
use tracing::info;

use super::PersistError;
use crate::config::StorageConfig;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `path`. Returns the stored path.
    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> Result<String, PersistError>;

    /// Public URL for a stored path.
    fn public_url(&self, path: &str) -> String;

    /// Remove a stored object by name.
    async fn remove_blob(&self, name: &str) -> Result<(), PersistError>;
}

/// Storage path for a newly dropped file.
#[must_use]
pub fn blob_path(file_name: &str, now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let safe: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    format!("{millis}-{safe}")
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpBlobStore {
    http: reqwest::Client,
    base: Url,
    key: String,
    bucket: String,
}

impl HttpBlobStore {
    /// # Errors
    ///
    /// Returns `Validation` if the base URL is not an absolute http(s) URL,
    /// or `Connectivity` if the HTTP client cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self, PersistError> {
        let base = Url::parse(&config.url).map_err(|e| PersistError::Validation(format!("STORAGE_URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(PersistError::Validation(format!("STORAGE_URL is not a base URL: {}", config.url)));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PersistError::Connectivity(e.to_string()))?;
        Ok(Self { http, base, key: config.key.clone(), bucket: config.bucket.clone() })
    }

    /// Base URL extended with percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn object_url(&self, path: &str) -> Url {
        self.url(&["storage", "v1", "object", &self.bucket, path])
    }

    async fn check(response: reqwest::Response) -> Result<(), PersistError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(PersistError::Validation(format!("status {}: {body}", status.as_u16())))
    }
}

#[async_trait::async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> Result<String, PersistError> {
        let size = bytes.len();
        let response = self
            .http
            .post(self.object_url(path))
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .header("content-type", "application/octet-stream")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;
        info!(path, size, "blob uploaded");
        Ok(path.to_string())
    }

    fn public_url(&self, path: &str) -> String {
        self.url(&["storage", "v1", "object", "public", &self.bucket, path]).to_string()
    }

    async fn remove_blob(&self, name: &str) -> Result<(), PersistError> {
        let response = self
            .http
            .delete(self.url(&["storage", "v1", "object", &self.bucket]))
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .json(&serde_json::json!({ "prefixes": [name] }))
            .send()
            .await?;
        Self::check(response).await?;
        info!(name, "blob removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "blobs_test.rs"]
mod tests;
