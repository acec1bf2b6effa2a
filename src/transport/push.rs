use super::TransportError;
use axum::async_trait;
use serde::Serialize;

/// Machine readable part of a push transmission, used by the mobile
/// application to deep link into the notified content.
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub id: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub title: Option<String>,
    pub body: Option<String>,
    pub payload: PushPayload,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushTransport: Send + Sync {
    ///
    /// Single target transmission through the push gateway.
    ///
    async fn push_single(
        &self,
        device_token: &str,
        message: PushMessage,
    ) -> Result<(), TransportError>;
}

/// Stand-in transport that only logs the transmission.
pub struct LoggingPushTransport;

#[async_trait]
impl PushTransport for LoggingPushTransport {
    async fn push_single(
        &self,
        device_token: &str,
        message: PushMessage,
    ) -> Result<(), TransportError> {
        tracing::debug!(device_token, ?message, "push transmission");
        Ok(())
    }
}
