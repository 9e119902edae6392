//! Image Upload
//!
//! Uploads an image to the third-party image host. The host API key is kept
//! in the data service's settings row and looked up on every upload.

use crate::backend::{BackendError, DataService};
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Image host upload endpoint
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://api.imgbb.com/1/upload";

/// Used when the host rejects an upload without saying why
pub const UPLOAD_FALLBACK_ERROR: &str = "Failed to upload image";

/// Binary image with its original file name
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: None,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an image from disk
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        let content_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => Some("image/png"),
            Some("jpg") | Some("jpeg") => Some("image/jpeg"),
            Some("gif") => Some("image/gif"),
            Some("webp") => Some("image/webp"),
            _ => None,
        };

        Ok(Self {
            file_name,
            bytes,
            content_type: content_type.map(str::to_string),
        })
    }
}

/// Why an upload did not produce a URL
#[derive(Error, Debug)]
pub enum UploadError {
    /// The settings row could not be read
    #[error("Failed to fetch image upload API key: {0}")]
    ApiKeyLookup(#[from] BackendError),

    /// The settings row has no key
    #[error("Image upload API key is not configured")]
    ApiKeyMissing,

    /// The host refused the image
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The host could not be reached or answered garbage
    #[error("Image upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Uploads images to the image host
pub struct ImageUploader {
    client: Client,
    backend: Arc<dyn DataService>,
    endpoint: String,
}

impl ImageUploader {
    pub fn new(client: Client, backend: Arc<dyn DataService>) -> Self {
        Self::with_endpoint(client, backend, DEFAULT_UPLOAD_ENDPOINT)
    }

    pub fn with_endpoint(
        client: Client,
        backend: Arc<dyn DataService>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            backend,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `image` and return its public URL
    pub async fn upload(&self, image: ImageFile) -> Result<String, UploadError> {
        let api_key = self
            .backend
            .get_upload_api_key()
            .await?
            .filter(|key| !key.trim().is_empty())
            .ok_or(UploadError::ApiKeyMissing)?;

        let name = unique_name(&image.file_name, Utc::now().timestamp_millis());
        let size = image.bytes.len();

        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = &image.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("image", part)
            .text("key", api_key)
            .text("name", name.clone());

        tracing::debug!(name = %name, bytes = size, "Uploading image");

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<UploadResponse>(&body).ok();

        let host_message = parsed
            .as_ref()
            .and_then(|r| r.error.as_ref())
            .and_then(|e| e.message.clone())
            .filter(|m| !m.trim().is_empty());

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Image host rejected upload");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message: host_message.unwrap_or_else(|| UPLOAD_FALLBACK_ERROR.to_string()),
            });
        }

        match parsed {
            Some(UploadResponse {
                success: true,
                data: Some(UploadData { url }),
                ..
            }) => {
                tracing::info!(name = %name, url = %url, "Image uploaded");
                Ok(url)
            }
            _ => {
                tracing::warn!(status = status.as_u16(), "Image host reported failure");
                Err(UploadError::Rejected {
                    status: status.as_u16(),
                    message: host_message.unwrap_or_else(|| UPLOAD_FALLBACK_ERROR.to_string()),
                })
            }
        }
    }
}

/// Name the image is stored under: `<unix millis>_<original name>`
pub fn unique_name(file_name: &str, timestamp_ms: i64) -> String {
    format!("{}_{}", timestamp_ms, file_name)
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<UploadData>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    #[serde(default)]
    message: Option<String>,
}
