//! Classroom Database Layer
//!
//! Persistence for teacher accounts, their students and the students'
//! courses, using SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::{CourseFilter, CourseQuery, Database};

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
