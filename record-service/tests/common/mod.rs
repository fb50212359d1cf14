#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use record_service::config::RecordConfig;
use record_service::services::{InMemoryRecordStore, RecordStore};
use record_service::startup::{build_router, AppState, Application};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";
pub const GIF_DATA_URI: &str = "data:image/gif;base64,R0lGODlhAQABAAAAACw=";

/// Router backed by the given store, for `oneshot` requests.
pub fn router_with(store: Arc<dyn RecordStore>) -> Router {
    build_router(AppState {
        config: RecordConfig::in_memory(),
        store,
    })
}

pub fn router() -> (Router, Arc<InMemoryRecordStore>) {
    let store = Arc::new(InMemoryRecordStore::new());
    (router_with(store.clone()), store)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn list(app: &Router) -> Vec<Value> {
    let request = Request::builder()
        .uri("/get-users")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().expect("Expected array").clone()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Serve the full application on a random port with an in-memory store.
    pub async fn spawn() -> Self {
        let app = Application::build_with_store(
            RecordConfig::in_memory(),
            Arc::new(InMemoryRecordStore::new()),
        )
        .await
        .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
