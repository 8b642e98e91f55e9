pub mod cloudinary;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cloudinary::CloudinaryClient;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image host not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// File bytes received from an upload form
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

/// Hosted image storage for sponsor logos
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, ImageError>;

    async fn delete(&self, public_id: &str) -> Result<(), ImageError>;
}
