//! Prometheus metrics endpoint

use axum::{Router, extract::State, routing::get};

use crate::state::MetricsHandle;

/// Create metrics routes with the Prometheus handle
pub fn routes(handle: MetricsHandle) -> Router {
    Router::new()
        .route("/metrics", get(render))
        .with_state(handle)
}

/// GET /metrics
async fn render(State(handle): State<MetricsHandle>) -> String {
    handle.render()
}
