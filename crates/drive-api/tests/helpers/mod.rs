//! Shared test helpers for API tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use drive_api::{AppState, build_app};
use drive_core::config::AppConfig;
use drive_database::MemoryTreeStore;
use drive_service::DriveEngine;
use drive_storage::LocalBlobStore;

/// Largest upload the test app accepts.
pub const MAX_UPLOAD_BYTES: u64 = 4 * 1024;

const BOUNDARY: &str = "drive-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Directory backing the blob store
    pub blob_root: TempDir,
}

/// A completed test request.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    /// Parsed JSON body, or `Null` when the body is not JSON.
    pub body: Value,
}

impl TestApp {
    /// Create a new test application over an in-memory tree store and a
    /// temporary blob directory.
    pub async fn new() -> Self {
        let blob_root = tempfile::tempdir().expect("Failed to create blob root");

        let mut config = AppConfig::default();
        config.storage.root_path = blob_root.path().to_string_lossy().to_string();
        config.storage.max_upload_size_bytes = MAX_UPLOAD_BYTES;

        let blobs = LocalBlobStore::new(&config.storage.root_path)
            .await
            .expect("Failed to init blob store");
        let engine = DriveEngine::new(
            Arc::new(MemoryTreeStore::new()),
            Arc::new(blobs),
            config.storage.max_upload_size_bytes,
        );

        let router = build_app(AppState::new(config, engine));

        Self { router, blob_root }
    }

    /// Send a request with an optional JSON body.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Upload a file through the multipart endpoint.
    pub async fn upload(
        &self,
        parent_id: Option<&str>,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        if let Some(parent_id) = parent_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"parent_id\"\r\n\r\n{parent_id}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/drive/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Create a folder and return its id.
    pub async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/drive/folder",
                Some(serde_json::json!({ "name": name, "parent_id": parent_id })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["id"]
            .as_str()
            .expect("folder id is a string")
            .to_string()
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}
