//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] classroom_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] classroom_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::DuplicateEmail(msg) => {
                (StatusCode::BAD_REQUEST, "DUPLICATE_EMAIL", msg.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "You do not own this record".to_string()),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Server error".to_string(),
                )
            }
            ApiError::Database(e) => match e {
                classroom_db::DbError::Duplicate(msg) => {
                    (StatusCode::BAD_REQUEST, "DUPLICATE_EMAIL", msg.clone())
                }
                classroom_db::DbError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
                }
                _ => {
                    error!("Storage error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        "Server error".to_string(),
                    )
                }
            },
            ApiError::Auth(e) => {
                let status = e.status();
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!("Authentication failure: {}", e);
                    "Server error".to_string()
                } else {
                    e.to_string()
                };
                (status, e.code(), message)
            }
        };

        let body = axum::Json(json!({
            "code": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
