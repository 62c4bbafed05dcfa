use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "Hello": "World" }))
}

// Health check endpoint - lightweight, no DB access
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: checks DB connectivity with timeout protection
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1").fetch_one(&state.db);
    match tokio::time::timeout(std::time::Duration::from_secs(5), query).await {
        Ok(Ok(_)) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let counters = [
        ("invenapp_products_created", "Products created", m.products_created),
        ("invenapp_categories_created", "Categories created", m.categories_created),
        ("invenapp_quarters_created", "Financial quarters created", m.quarters_created),
        ("invenapp_discounts_created", "Discounts created", m.discounts_created),
        ("invenapp_employees_created", "Employees created", m.employees_created),
        ("invenapp_barcodes_accepted", "Barcodes accepted", m.barcodes_accepted),
        ("invenapp_barcodes_rejected_empty", "Barcodes rejected as empty", m.barcodes_rejected_empty),
        ("invenapp_barcodes_rejected_type", "Barcodes rejected for missing or unknown type", m.barcodes_rejected_type),
        ("invenapp_barcodes_rejected_format", "Barcodes rejected by format rule", m.barcodes_rejected_format),
        ("invenapp_barcodes_rejected_checksum", "Barcodes rejected by check digit", m.barcodes_rejected_checksum),
        ("invenapp_barcodes_rejected_length", "Valid barcodes too long to store", m.barcodes_rejected_length),
    ];
    let mut body = String::new();
    for (name, help, value) in counters {
        body.push_str(&format!("# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n"));
    }
    body.push_str(&format!(
        "# HELP invenapp_uptime_seconds Uptime seconds\n# TYPE invenapp_uptime_seconds gauge\ninvenapp_uptime_seconds {}\n",
        m.uptime_seconds
    ));
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
