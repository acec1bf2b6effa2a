use super::{ChannelError, DeliveryChannel, DeliveryOutcome};
use crate::{
    content::{MailerSelector, ResolvedContent},
    repository::{DeliveryWay, NotificationRecord, SettingsRepository},
    transport::EmailTransport,
};
use axum::async_trait;
use std::sync::Arc;

pub struct EmailChannelConfig {
    /// Applied when the receiver's setting leaves accept_email unset.
    pub default_send_email: bool,
}

/// Hands the notification over to the mailing system when the
/// receiver accepts email. Category mailers are invoked with the
/// notifiable id, the default mailer renders from the notification
/// itself.
pub struct EmailChannel {
    config: EmailChannelConfig,
    settings_repository: Arc<dyn SettingsRepository>,
    transport: Arc<dyn EmailTransport>,
}

impl EmailChannel {
    pub fn new(
        config: EmailChannelConfig,
        settings_repository: Arc<dyn SettingsRepository>,
        transport: Arc<dyn EmailTransport>,
    ) -> Self {
        Self {
            config,
            settings_repository,
            transport,
        }
    }

    async fn email_enabled(&self, notification: &NotificationRecord) -> Result<bool, ChannelError> {
        let setting = self
            .settings_repository
            .find(&notification.receiver)
            .await?;

        let enabled = match setting.and_then(|setting| setting.accept_email) {
            Some(accept) => accept,
            None => self.config.default_send_email,
        };

        Ok(enabled)
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn way(&self) -> DeliveryWay {
        DeliveryWay::Email
    }

    async fn attempt(
        &self,
        notification: &NotificationRecord,
        content: &ResolvedContent,
    ) -> Result<DeliveryOutcome, ChannelError> {
        if !self.email_enabled(notification).await? {
            tracing::debug!("receiver does not accept email");
            return Ok(DeliveryOutcome::Skipped);
        }

        let (mailer, target_id) = match (&content.mailer, &notification.notifiable) {
            (Some(mailer), Some(notifiable)) => (mailer.clone(), notifiable.id.clone()),
            _ => (MailerSelector::default(), notification.id.to_hex()),
        };

        self.transport
            .send(
                &mailer,
                &target_id,
                &content.cc_emails,
                notification.sending_at,
            )
            .await?;

        Ok(DeliveryOutcome::Delivered)
    }
}
