//! Notification type and delivery trait

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::error::NotifyError;

/// A single plain-text notice
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl Notification {
    /// Notice sent to a newly provisioned student carrying their initial password
    pub fn account_created(to: &str, name: &str, password: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Your Account Password".to_string(),
            text: format!(
                "Hello {},\n\nYour account has been created.\nYour password: {}\n\nPlease change it after login.",
                name, password
            ),
        }
    }
}

/// Delivery backend for notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier used when no relay is configured. Records that a notice was
/// produced without writing its text (which may hold a password) to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            "No notification relay configured; dropping '{}' for {}",
            notification.subject, notification.to
        );
        Ok(())
    }
}
