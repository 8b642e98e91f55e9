mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use golf_classic_api::testing::{bearer, MockDatabase, MockImageHost};
use serde_json::json;

use common::{TestApp, ADMIN};

const BOUNDARY: &str = "golfclassicboundary";

fn multipart_request(field: &str, file_name: &str, contents: &[u8], authorized: bool) -> Result<Request<Body>> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY));
    if authorized {
        builder = builder.header(header::AUTHORIZATION, bearer(ADMIN));
    }
    Ok(builder.body(Body::from(body))?)
}

#[tokio::test]
async fn upload_returns_url_and_public_id() -> Result<()> {
    let app = TestApp::new(MockDatabase::new());

    let (status, body) = app.send(multipart_request("file", "acme.png", b"\x89PNG....", true)?).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "url": "https://images.test/golf-classic/acme.png",
            "publicId": "golf-classic/acme"
        })
    );
    let uploads = app.images.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name, "acme.png");
    assert_eq!(uploads[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(app.db.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() -> Result<()> {
    let app = TestApp::new(MockDatabase::new());

    let (status, body) = app.send(multipart_request("logo", "acme.png", b"\x89PNG", true)?).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No file provided" }));
    assert!(app.images.uploads().is_empty());
    Ok(())
}

#[tokio::test]
async fn upload_without_multipart_body_is_rejected() -> Result<()> {
    let app = TestApp::new(MockDatabase::new());
    let (status, body) = app.admin("POST", "/api/upload", &json!({ "file": "acme.png" })).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No file provided" }));
    Ok(())
}

#[tokio::test]
async fn image_host_failure_is_a_bad_gateway() -> Result<()> {
    let app = TestApp::with_images(MockDatabase::new(), MockImageHost::new().failing_uploads());

    let (status, body) = app.send(multipart_request("file", "acme.png", b"\x89PNG", true)?).await?;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": "Failed to upload image" }));
    Ok(())
}

#[tokio::test]
async fn anonymous_upload_is_unauthorized() -> Result<()> {
    let app = TestApp::new(MockDatabase::new());

    let (status, _) = app.send(multipart_request("file", "acme.png", b"\x89PNG", false)?).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.images.uploads().is_empty());
    Ok(())
}
