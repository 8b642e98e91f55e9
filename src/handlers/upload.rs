use axum::extract::{multipart::MultipartRejection, Multipart, State};

use crate::error::ApiError;
use crate::images::{UploadFile, UploadedImage};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /api/upload - multipart field `file` to the image host
pub async fn upload(
    State(state): State<AppState>,
    principal: Option<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadedImage> {
    if principal.is_none() {
        return Err(ApiError::unauthorized());
    }

    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload without a multipart body: {}", e);
        ApiError::bad_request("No file provided")
    })?;

    let file = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    tracing::debug!(file_name = %file.file_name, size = file.bytes.len(), "Uploading image");

    let uploaded = state.images.upload(file).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to upload image");
        ApiError::bad_gateway("Failed to upload image")
    })?;

    Ok(ApiResponse::success(uploaded))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Malformed multipart body: {}", e);
        ApiError::bad_request("No file provided")
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            tracing::debug!("Failed to read upload: {}", e);
            ApiError::bad_request("No file provided")
        })?;

        if bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}
