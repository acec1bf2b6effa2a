use super::TransportError;
use axum::async_trait;
use serde::Serialize;

/// Payload broadcast to one live connection of the receiver.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimePayload {
    pub id: String,
    pub body: Option<String>,
    /// Receiver's current unread total.
    pub count: u64,
    pub link: String,
    pub showtime: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    ///
    /// Fire and forget broadcast to one connection token.
    ///
    async fn broadcast(&self, token: &str, payload: RealtimePayload)
        -> Result<(), TransportError>;
}

/// Stand-in transport that only logs the broadcast.
pub struct LoggingRealtimeTransport;

#[async_trait]
impl RealtimeTransport for LoggingRealtimeTransport {
    async fn broadcast(
        &self,
        token: &str,
        payload: RealtimePayload,
    ) -> Result<(), TransportError> {
        tracing::debug!(token, ?payload, "realtime broadcast");
        Ok(())
    }
}
