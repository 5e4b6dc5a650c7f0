//! Exporter HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use immich_metrics::{render_build_info, render_prometheus};

use crate::ApiState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
///
/// Takes a fresh snapshot on every scrape; nothing is cached between calls.
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.collector.snapshot().await;

    let mut body = render_prometheus(state.collector.catalog(), &snapshot);
    body.push_str(&render_build_info(&state.build_info));

    (
        StatusCode::OK,
        [("content-type", PROMETHEUS_CONTENT_TYPE)],
        body,
    )
}

// ── Health ─────────────────────────────────────────────────────

/// GET /health
pub async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    match state.collector.client().ping().await {
        Ok(()) => (StatusCode::OK, "ok".to_string()),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, format!("unhealthy: {e}"))
        }
    }
}
