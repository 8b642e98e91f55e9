use axum::{
    body::Bytes,
    extract::{Path, State},
};
use serde_json::Value;

use crate::database::Row;
use crate::entities::SPONSORS;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::workflow::{FieldKind, PatchWorkflow, WorkflowError};

use super::json_body;

const PUBLIC_ID: &str = "cloudinary_public_id";

/// PATCH /api/sponsors/:id
///
/// Replacing `cloudinaryPublicId` removes the previously hosted logo once
/// the row points at the new one. A failed removal is only logged.
pub async fn patch(
    State(state): State<AppState>,
    principal: Option<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Value> {
    let spec = SPONSORS
        .patch
        .as_ref()
        .ok_or_else(|| ApiError::internal_server_error("Failed to update sponsor"))?;
    let workflow = PatchWorkflow::new(spec);
    let body = json_body(&body);

    let plan = workflow
        .plan(principal.as_ref(), &body)
        .map_err(|e| e.into_api_error(spec.failure))?;

    let previous = if plan.touches("cloudinaryPublicId") {
        let rows = state
            .db()
            .execute(
                "SELECT cloudinary_public_id FROM \"sponsors\" WHERE id::text = $1::text",
                &[FieldKind::Id.normalize(&Value::String(id.clone()))],
            )
            .await
            .map_err(|e| WorkflowError::from(e).into_api_error(spec.failure))?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(spec.not_found))?;
        public_id(&row)
    } else {
        None
    };

    let row = workflow
        .apply(state.db(), &id, &plan)
        .await
        .map_err(|e| e.into_api_error(spec.failure))?;

    if let Some(old) = previous {
        if public_id(&row).as_deref() != Some(old.as_str()) {
            remove_image(&state, &old).await;
        }
    }

    Ok(ApiResponse::success(Value::Object(row)))
}

/// DELETE /api/sponsors/:id - removes the row, then its hosted logo
pub async fn delete(
    State(state): State<AppState>,
    principal: Option<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    if principal.is_none() {
        return Err(ApiError::unauthorized());
    }

    let rows = state
        .db()
        .execute(
            "DELETE FROM \"sponsors\" WHERE id::text = $1::text RETURNING *",
            &[FieldKind::Id.normalize(&Value::String(id))],
        )
        .await
        .map_err(|e| WorkflowError::from(e).into_api_error("Failed to delete sponsor"))?;

    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("Sponsor not found"))?;

    if let Some(public_id) = public_id(&row) {
        remove_image(&state, &public_id).await;
    }

    Ok(ApiResponse::success(Value::Object(row)))
}

fn public_id(row: &Row) -> Option<String> {
    row.get(PUBLIC_ID)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

async fn remove_image(state: &AppState, public_id: &str) {
    match state.images.delete(public_id).await {
        Ok(()) => tracing::info!(public_id, "Removed sponsor image"),
        Err(e) => tracing::warn!(public_id, error = %e, "Failed to remove sponsor image"),
    }
}
