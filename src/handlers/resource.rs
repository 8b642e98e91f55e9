use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde_json::Value;

use crate::entities::Entity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::workflow::{CreateWorkflow, ListWorkflow, PatchWorkflow};

use super::json_body;

/// GET /api/<entity> - joined list, optionally narrowed by one filter id
pub async fn list<E: Entity>(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let spec = &E::descriptor().list;

    let rows = ListWorkflow::new(spec).run(state.db(), &query).await.map_err(|e| {
        tracing::error!(error = %e, "{}", spec.failure);
        ApiError::internal_server_error(spec.failure)
    })?;

    Ok(ApiResponse::success(Value::Array(rows.into_iter().map(Value::Object).collect())))
}

/// POST /api/<entity> - validated create
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    principal: Option<AuthUser>,
    body: Bytes,
) -> ApiResult<Value> {
    let spec = &E::descriptor().create;
    let body = json_body(&body);

    let row = CreateWorkflow::new(spec)
        .run(state.db(), principal.as_ref(), &body)
        .await
        .map_err(|e| e.into_api_error(spec.failure))?;

    tracing::info!(table = spec.table, id = ?row.get("id"), "Created");
    Ok(ApiResponse::created(Value::Object(row)))
}

/// PATCH /api/<entity>/:id - whitelisted sparse update
pub async fn patch<E: Entity>(
    State(state): State<AppState>,
    principal: Option<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Value> {
    let descriptor = E::descriptor();
    let spec = descriptor
        .patch
        .as_ref()
        .ok_or_else(|| ApiError::not_found(format!("{} cannot be updated", descriptor.name)))?;
    let body = json_body(&body);

    let row = PatchWorkflow::new(spec)
        .run(state.db(), principal.as_ref(), &id, &body)
        .await
        .map_err(|e| e.into_api_error(spec.failure))?;

    Ok(ApiResponse::success(Value::Object(row)))
}
