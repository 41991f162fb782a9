use bytes::Bytes;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Error;

/// Seam in front of the external image host.
pub trait MediaUploader {
    async fn upload_image(&self, filename: &str, content: Bytes) -> Result<String, Error>;
}

#[derive(Debug, Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ImageHostClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
}

impl MediaUploader for ImageHostClient {
    async fn upload_image(&self, filename: &str, content: Bytes) -> Result<String, Error> {
        let part = reqwest::multipart::Part::bytes(content.to_vec()).file_name(filename.to_owned());
        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("public_id", Uuid::new_v4().to_string())
            .part("file", part);
        let response = self
            .client
            .post(format!("{}/image/upload", self.endpoint))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let result: UploadResult = response.json().await?;
        Ok(result.secure_url)
    }
}
