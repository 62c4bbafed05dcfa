//! Integration and unit tests for the inventory API.
//!
//! - **api_tests**: record endpoints, including barcode rejection on product creation
//! - **error_tests**: `AppError` display, status mapping and field validation helpers
//! - **config_tests**: configuration loading and validation
//! - **db_tests**: schema creation and store-level constraints
//! - **health_api_tests**: greeting, health, readiness, metrics and version endpoints
//!
//! Run a single module with e.g. `cargo test api_tests`.

pub mod api_tests;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{config::AppConfig, db, routes, state::AppState};

/// A fresh file-backed database with the schema applied.
///
/// The returned `TempDir` must outlive the pool.
pub(crate) async fn setup_test_db() -> (sqlx::SqlitePool, TempDir) {
    let dir = TempDir::new().unwrap();
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("invenapp-test.db"))
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await.unwrap();
    db::init_db(&pool).await.unwrap();
    (pool, dir)
}

pub(crate) async fn setup_test_app() -> (Router, AppState, TempDir) {
    let (pool, dir) = setup_test_db().await;
    let state = AppState::new(pool, AppConfig::default());
    (routes::router(state.clone()), state, dir)
}

/// Sends a request and returns the status plus the body parsed as JSON
/// (`Value::Null` for non-JSON bodies).
pub(crate) async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
