use super::TransportError;
use crate::content::MailerSelector;
use axum::async_trait;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailTransport: Send + Sync {
    ///
    /// Hands the notification over to the mailing system.
    /// `deliver_at` defers the send until the given time.
    ///
    async fn send(
        &self,
        mailer: &MailerSelector,
        target_id: &str,
        cc_emails: &[String],
        deliver_at: Option<OffsetDateTime>,
    ) -> Result<(), TransportError>;
}

/// Stand-in transport that only logs the send.
pub struct LoggingEmailTransport;

#[async_trait]
impl EmailTransport for LoggingEmailTransport {
    async fn send(
        &self,
        mailer: &MailerSelector,
        target_id: &str,
        cc_emails: &[String],
        deliver_at: Option<OffsetDateTime>,
    ) -> Result<(), TransportError> {
        tracing::debug!(
            mailer = %mailer.mailer,
            method = %mailer.method,
            target_id,
            ?cc_emails,
            ?deliver_at,
            "email send",
        );
        Ok(())
    }
}
