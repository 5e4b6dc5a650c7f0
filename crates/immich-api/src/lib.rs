//! immich-api — HTTP surface of the Immich exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition (one fresh snapshot per scrape) |
//! | GET | `/health` | Liveness: `ok` if the Immich API answers, else 503 |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use immich_metrics::{BuildInfo, Collector};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub collector: Arc<Collector>,
    pub build_info: Arc<BuildInfo>,
}

impl ApiState {
    pub fn new(collector: Collector, build_info: BuildInfo) -> Self {
        Self {
            collector: Arc::new(collector),
            build_info: Arc::new(build_info),
        }
    }
}

/// Build the exporter router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/health", get(handlers::health))
        .with_state(state)
}
