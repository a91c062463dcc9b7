//! Classroom Outbound Notifications
//!
//! This crate delivers one-shot notices (such as a newly provisioned
//! student's initial password) to an external mail relay. Delivery is
//! best-effort: callers dispatch and move on.

pub mod dispatcher;
pub mod error;
pub mod notifier;
pub mod webhook;

pub use dispatcher::{DEFAULT_ALLOWED_DOMAINS, Dispatcher, RecipientPolicy};
pub use error::NotifyError;
pub use notifier::{LogNotifier, Notification, Notifier};
pub use webhook::{WebhookConfig, WebhookNotifier};
