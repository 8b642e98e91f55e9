use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageError, ImageHost, UploadFile, UploadedImage};
use crate::config::ImageConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Signed Cloudinary uploads and deletes
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryClient {
    pub fn from_config(config: &ImageConfig) -> Result<Self, ImageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.ensure_configured().is_ok()
    }

    fn ensure_configured(&self) -> Result<(), ImageError> {
        if self.cloud_name.is_empty() {
            return Err(ImageError::NotConfigured("CLOUDINARY_CLOUD_NAME"));
        }
        if self.api_key.is_empty() {
            return Err(ImageError::NotConfigured("CLOUDINARY_API_KEY"));
        }
        if self.api_secret.is_empty() {
            return Err(ImageError::NotConfigured("CLOUDINARY_API_SECRET"));
        }
        Ok(())
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", API_BASE, self.cloud_name, action)
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    async fn rejected(response: reqwest::Response) -> ImageError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        ImageError::Rejected { status, message }
    }
}

/// Request signature: params sorted by name, joined as `k=v&k=v`, secret
/// appended, SHA-256 hex digest.
pub(crate) fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, ImageError> {
        self.ensure_configured()?;

        let timestamp = Self::timestamp();
        let signature = sign(&[("folder", self.folder.as_str()), ("timestamp", timestamp.as_str())], &self.api_secret);

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        if !self.folder.is_empty() {
            form = form.text("folder", self.folder.clone());
        }

        let response = self.http.post(self.endpoint("upload")).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: UploadResponse = response.json().await?;
        tracing::info!(public_id = %body.public_id, "Uploaded image");

        Ok(UploadedImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), ImageError> {
        self.ensure_configured()?;

        let timestamp = Self::timestamp();
        let signature = sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())], &self.api_secret);

        let params = [
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self.http.post(self.endpoint("destroy")).form(&params).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: DestroyResponse = response.json().await?;
        match body.result.as_str() {
            "ok" => {
                tracing::info!(public_id, "Deleted image");
                Ok(())
            }
            // Already gone is as good as deleted
            "not found" => {
                tracing::debug!(public_id, "Image already absent");
                Ok(())
            }
            other => Err(ImageError::Rejected {
                status: 200,
                message: other.to_string(),
            }),
        }
    }
}
