//! Fire-and-forget dispatch of notifications

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::NotifyError;
use crate::notifier::{Notification, Notifier};

/// Mail domains accepted when no explicit list is configured
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

/// Which recipient domains may be notified. An empty list admits any domain.
#[derive(Debug, Clone)]
pub struct RecipientPolicy {
    allowed_domains: Vec<String>,
}

impl RecipientPolicy {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_domains: domains
                .into_iter()
                .map(|d| d.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Policy admitting every recipient
    pub fn any() -> Self {
        Self {
            allowed_domains: Vec::new(),
        }
    }

    pub fn check(&self, recipient: &str) -> Result<(), NotifyError> {
        if self.allowed_domains.is_empty() {
            return Ok(());
        }

        let domain = recipient
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_ascii_lowercase())
            .unwrap_or_default();

        if self.allowed_domains.iter().any(|d| *d == domain) {
            Ok(())
        } else {
            Err(NotifyError::UnsupportedRecipient(recipient.to_string()))
        }
    }
}

impl Default for RecipientPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DOMAINS.iter().copied())
    }
}

/// Applies the recipient policy and a time bound around a `Notifier`
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    policy: RecipientPolicy,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, policy: RecipientPolicy, timeout: Duration) -> Self {
        Self {
            notifier,
            policy,
            timeout,
        }
    }

    /// Deliver a notification, waiting for the outcome
    pub async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.policy.check(&notification.to)?;

        match tokio::time::timeout(self.timeout, self.notifier.send(notification)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(self.timeout.as_secs())),
        }
    }

    /// Deliver a notification on a background task. Failures are logged and
    /// never reach the caller.
    pub fn dispatch(&self, notification: Notification) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            match dispatcher.deliver(&notification).await {
                Ok(()) => {
                    metrics::counter!("classroom_notifications_total", "outcome" => "sent")
                        .increment(1);
                    info!("Notification sent to {}", notification.to);
                }
                Err(e) => {
                    metrics::counter!("classroom_notifications_total", "outcome" => "failed")
                        .increment(1);
                    warn!("Notification to {} failed: {}", notification.to, e);
                }
            }
        })
    }
}
