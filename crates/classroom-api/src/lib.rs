//! Classroom REST API
//!
//! This crate provides the Axum-based HTTP API: teacher signup and login,
//! teacher-managed student records and student-managed course records.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
