//! Webhook mail relay client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::NotifyError;
use crate::notifier::{Notification, Notifier};

/// Webhook relay configuration
#[derive(Clone, Debug)]
pub struct WebhookConfig {
    /// Endpoint that accepts `POST` mail requests
    pub url: String,
    /// Sender address placed in the `from` field
    pub sender: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Wire body posted to the relay
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Delivers notifications by posting them as JSON to an HTTP mail relay
pub struct WebhookNotifier {
    config: WebhookConfig,
    client: Client,
}

impl WebhookNotifier {
    /// Create a new webhook notifier
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        info!("Created notification relay client for {}", config.url);

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        debug!("Posting notification for {} to relay", notification.to);

        let response = self
            .client
            .post(&self.config.url)
            .json(&RelayMessage {
                from: &self.config.sender,
                to: &notification.to,
                subject: &notification.subject,
                text: &notification.text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
