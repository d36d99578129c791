//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

use meetsync::api::AppState;
use meetsync::api::app;
use meetsync::core::AppConfig;
use meetsync::core::db::{async_db, migrate};

/// Creates a test application backed by a fresh SQLite file. Keep the
/// returned `TempDir` alive for as long as the app is used.
pub async fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("db").join("meetsync.sqlite");
    let db_path = db_path.to_str().unwrap().to_string();

    let db = async_db(&db_path)
        .await
        .expect("Failed to connect to async db");
    migrate(&db).await.expect("Failed to migrate db");

    let app_config = AppConfig {
        storage_path: dir.path().display().to_string(),
        db_path,
        cache_path: dir.path().join("cache").display().to_string(),
        api_url: String::from("http://localhost:3001"),
        frontend_url: Some(String::from("https://meet.example.com")),
        id_attempts: 5,
    };
    let app_state = AppState::new(db, app_config);
    (app(Arc::new(app_state)), dir)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Send a request with an optional JSON body and parse the JSON
/// response
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = body_to_string(response.into_body()).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap()
    };
    (status, value)
}

/// Create a one hour event on two specific dates, returning its id
pub async fn create_test_event(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/events",
        Some(serde_json::json!({
            "name": "Team sync",
            "dateMode": "specific",
            "dates": ["2026-03-02", "2026-03-03"],
            "startHour": 9,
            "endHour": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}
