use async_trait::async_trait;
use log::{error, info};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::ClientConfig;
use crate::errors::BoothError;

/// Where the host put an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub file_id: Option<String>,
}

/// External image host: accepts bytes, returns a public URL, fails closed.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage, BoothError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

/// Multipart upload (`file`, `upload_preset`) to an image host that answers
/// with `secure_url` / `public_id`.
#[derive(Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
    preset: Option<String>,
}

impl HttpUploader {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.upload_url.clone(),
            preset: config.upload_preset.clone(),
        }
    }
}

fn upload_failure(err: impl std::fmt::Display) -> BoothError {
    error!("image upload failed: {}", err);
    BoothError::UploadFailure(err.to_string())
}

#[async_trait]
impl ImageUploader for HttpUploader {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage, BoothError> {
        if bytes.is_empty() {
            return Err(BoothError::UploadFailure("no image data".to_string()));
        }
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .map_err(upload_failure)?;
        let mut form = Form::new().part("file", part);
        if let Some(preset) = &self.preset {
            form = form.text("upload_preset", preset.clone());
        }

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(upload_failure)?
            .error_for_status()
            .map_err(upload_failure)?;
        let body: UploadResponse = resp.json().await.map_err(upload_failure)?;
        match body.secure_url {
            Some(url) if !url.is_empty() => {
                info!("uploaded {} to {}", file_name, url);
                Ok(UploadedImage {
                    url,
                    file_id: body.public_id,
                })
            }
            _ => Err(upload_failure("host response carried no secure_url")),
        }
    }
}
