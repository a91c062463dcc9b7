//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use classroom_db::Role;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid Email or Password")]
    InvalidCredentials,

    #[error("Role is required")]
    MissingRole,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Authorization header missing")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Token missing")]
    MissingToken,

    #[error("Access denied. Only {required}s allowed.")]
    RoleMismatch { required: Role },

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    TokenSigning(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::MissingRole => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::RoleMismatch { .. } => StatusCode::FORBIDDEN,
            AuthError::PasswordHash(_) | AuthError::TokenSigning(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingRole => "MISSING_ROLE",
            AuthError::InvalidToken => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::MissingAuthHeader => "MISSING_AUTH_HEADER",
            AuthError::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::RoleMismatch { .. } => "ROLE_MISMATCH",
            AuthError::PasswordHash(_) | AuthError::TokenSigning(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Authentication failure: {}", self);
            "Server error".to_string()
        } else {
            self.to_string()
        };

        let body = axum::Json(json!({
            "code": self.code(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
