#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use golf_classic_api::routes;
use golf_classic_api::testing::{bearer, test_state, MockDatabase, MockImageHost};

pub const ADMIN: &str = "admin-1";

/// Router wired to the given mocks; keep the `Arc`s to inspect calls afterwards
pub struct TestApp {
    pub db: Arc<MockDatabase>,
    pub images: Arc<MockImageHost>,
    router: Router,
}

impl TestApp {
    pub fn new(db: MockDatabase) -> Self {
        Self::with_images(db, MockImageHost::new())
    }

    pub fn with_images(db: MockDatabase, images: MockImageHost) -> Self {
        let db = db.into_shared();
        let images = images.into_shared();
        let router = routes::router(test_state(db.clone(), images.clone()));
        Self { db, images, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Request::builder().uri(uri).body(Body::empty())?).await
    }

    /// JSON request signed as [`ADMIN`]
    pub async fn admin(&self, method: &str, uri: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.send(json_request(method, uri, body, Some(&bearer(ADMIN)))?).await
    }

    pub async fn anonymous(&self, method: &str, uri: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.send(json_request(method, uri, body, None)?).await
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value, authorization: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    Ok(builder.body(Body::from(serde_json::to_vec(body)?))?)
}

pub fn row(id: &str, fields: Value) -> Value {
    let mut row = serde_json::json!({
        "id": id,
        "created_at": "2025-03-01T12:00:00+00:00",
        "updated_at": "2025-03-01T12:00:00+00:00",
    });
    if let (Some(target), Value::Object(extra)) = (row.as_object_mut(), fields) {
        target.extend(extra);
    }
    row
}
