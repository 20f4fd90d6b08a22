//! HTTP handlers for the scrape and health endpoints.

use crate::web::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render current gauge values.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.handle.render(),
    )
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "device": &*state.device,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Plain-text landing page pointing at the metrics path.
pub async fn index(State(state): State<AppState>) -> String {
    format!(
        "PM1006 exporter {}\nMetrics: {}\nHealth: /api/health\n",
        env!("CARGO_PKG_VERSION"),
        state.metrics_path
    )
}
