//! User-visible notifications raised by the capture and gallery view models.
//!
//! Every view-model operation ends in exactly one notification: a success
//! message, or an error carrying the collaborator's message. Views render them
//! as transient toasts.

use tokio::sync::mpsc::UnboundedSender;

use crate::core::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            severity: Severity::Success,
        }
    }

    pub fn error(title: impl Into<String>, error: &AppError) -> Self {
        Self {
            title: title.into(),
            description: Some(error.user_message()),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Sink for notifications, supplied to each view model at construction
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl Notifier for UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("Notification dropped: receiver closed");
        }
    }
}
