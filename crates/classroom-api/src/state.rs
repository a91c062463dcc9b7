//! Application state

use classroom_auth::TokenService;
use classroom_db::Database;
use classroom_notify::Dispatcher;
use std::sync::Arc;

/// Prometheus handle used to render the `/metrics` endpoint
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub notifications: Dispatcher,
}

impl AppState {
    pub fn new(db: Database, tokens: Arc<TokenService>, notifications: Dispatcher) -> Self {
        Self {
            db,
            tokens,
            notifications,
        }
    }
}
