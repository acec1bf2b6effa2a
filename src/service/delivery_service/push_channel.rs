use super::{ChannelError, DeliveryChannel, DeliveryOutcome};
use crate::{
    content::ResolvedContent,
    entity::EntityRegistry,
    repository::{DeliveryWay, NotificationRecord},
    transport::{PushMessage, PushPayload, PushTransport},
};
use axum::async_trait;
use std::sync::Arc;

/// Sends a single target push transmission when the receiver has a
/// registered device.
pub struct PushChannel {
    entities: Arc<EntityRegistry>,
    transport: Arc<dyn PushTransport>,
}

impl PushChannel {
    pub fn new(entities: Arc<EntityRegistry>, transport: Arc<dyn PushTransport>) -> Self {
        Self { entities, transport }
    }
}

#[async_trait]
impl DeliveryChannel for PushChannel {
    fn way(&self) -> DeliveryWay {
        DeliveryWay::Push
    }

    async fn attempt(
        &self,
        notification: &NotificationRecord,
        content: &ResolvedContent,
    ) -> Result<DeliveryOutcome, ChannelError> {
        let Some(source) = self.entities.receiver(&notification.receiver.kind) else {
            return Ok(DeliveryOutcome::Skipped);
        };
        let Some(device_token) = source.push_token(&notification.receiver.id).await? else {
            tracing::debug!("receiver has no push token");
            return Ok(DeliveryOutcome::Skipped);
        };

        let message = PushMessage {
            title: content.title.clone(),
            body: content.body.clone(),
            payload: PushPayload {
                id: notification.id.to_hex(),
                link: content.link.clone(),
            },
        };

        self.transport.push_single(&device_token, message).await?;

        Ok(DeliveryOutcome::Delivered)
    }
}
