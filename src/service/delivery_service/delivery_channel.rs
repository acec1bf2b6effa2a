use crate::{
    content::ResolvedContent, entity, repository, repository::DeliveryWay,
    transport::TransportError,
};
use axum::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Entity(#[from] entity::Error),

    #[error("database error: {0}")]
    Database(#[from] repository::Error),
}

impl ChannelError {
    /// Whether repeating the attempt may succeed. Infrastructure
    /// failures count as retryable, only the gateway can declare a
    /// send permanently failed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChannelError::Transport(err) => err.retryable,
            ChannelError::Entity(_) | ChannelError::Database(_) => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Channel not applicable for this receiver.
    Skipped,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn way(&self) -> DeliveryWay;

    ///
    /// Attempts delivery of the notification through this channel.
    /// Channels never mutate the notification beyond appending their
    /// own delivery records.
    ///
    async fn attempt(
        &self,
        notification: &repository::NotificationRecord,
        content: &ResolvedContent,
    ) -> Result<DeliveryOutcome, ChannelError>;
}
