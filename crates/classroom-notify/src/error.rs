//! Notification error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsupported email provider: {0}")]
    UnsupportedRecipient(String),

    #[error("Relay returned error: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Delivery timed out after {0}s")]
    Timeout(u64),
}
