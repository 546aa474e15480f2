use crate::domain::notification::{Message, Notification, Recipient};
use crate::domain::ports::NotificationSink;
use async_trait::async_trait;
use tracing::{info, warn};

/// Delivers notifications to the structured log instead of an email service.
///
/// Admin-addressed messages fan out to the configured allow-list; with an
/// empty list they are dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationSink {
    admin_emails: Vec<String>,
}

impl LogNotificationSink {
    pub fn new(admin_emails: Vec<String>) -> Self {
        Self { admin_emails }
    }

    /// Resolves a recipient to printable addresses, `None` when undeliverable.
    fn addresses(&self, recipient: &Recipient) -> Option<String> {
        match recipient {
            Recipient::Admins if self.admin_emails.is_empty() => None,
            Recipient::Admins => Some(self.admin_emails.join(", ")),
            Recipient::Address(address) => Some(address.clone()),
            Recipient::Professional { id, name } => Some(format!("{name} <profile:{id}>")),
        }
    }
}

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(&self, notification: Notification) {
        let Message { to, subject, body } = notification.render();
        let Some(addresses) = self.addresses(&to) else {
            warn!(%subject, "No admin emails configured, notification not sent");
            return;
        };
        info!(to = %addresses, %subject, "Sending notification\n{body}");
    }
}
