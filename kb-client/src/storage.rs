use crate::backend::HTTP_CLIENT;
use crate::config::Config;
use crate::errors::{EditorError, EditorResult};

/// Avatars larger than this are rejected before any upload happens.
const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Client for the backend's object storage. Uploads are fire-and-forget; the
/// returned URL is publicly resolvable without credentials.
#[derive(Clone)]
pub struct StorageClient {
    base: String,
    anon_key: String,
    access_token: String,
}

impl StorageClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.backend_url.clone(),
            anon_key: config.anon_key.clone(),
            access_token: config.access_token.clone(),
        }
    }

    /// Upload an object and return its public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> EditorResult<String> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base, bucket, path);
        let response = HTTP_CLIENT
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", content_type)
            .body(content)
            .send()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EditorError::backend(if message.is_empty() {
                "Failed to upload file".to_string()
            } else {
                message
            }));
        }
        Ok(self.public_url(bucket, path))
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base, bucket, path)
    }

    /// Upload a user's avatar image into the `avatars` bucket under a
    /// timestamped name, so a new upload never overwrites the previous one.
    pub async fn upload_avatar(
        &self,
        user_id: &str,
        extension: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> EditorResult<String> {
        if !content_type.starts_with("image/") {
            return Err(EditorError::backend("Please upload an image file"));
        }
        if content.len() > MAX_AVATAR_BYTES {
            return Err(EditorError::backend("Image size should be less than 5MB"));
        }
        let path = format!(
            "{}-{}.{}",
            user_id,
            chrono::Utc::now().timestamp_micros(),
            extension
        );
        self.upload("avatars", &path, content, content_type).await
    }
}
