//! API routes

mod courses;
mod health;
pub mod metrics;
mod students;
mod teacher;
pub mod types;
mod validation;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::cors::CorsLayer;

use crate::state::{AppState, MetricsHandle};

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<MetricsHandle>) -> Router {
    let mut router = Router::new()
        // Health check
        .merge(health::routes())
        // Teacher accounts and login for both roles
        .merge(teacher::routes())
        // Teacher-scoped student records
        .merge(students::routes(&state))
        // Student-scoped course records
        .merge(courses::routes(&state))
        .with_state(state)
        .layer(DefaultBodyLimit::max(64 * 1024));

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    // The browser client is served from a separate origin
    router.layer(CorsLayer::permissive())
}
