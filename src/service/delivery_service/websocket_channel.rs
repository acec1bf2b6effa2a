use super::{ChannelError, DeliveryChannel, DeliveryOutcome};
use crate::{
    content::ResolvedContent,
    entity::EntityRegistry,
    repository::{DeliveryWay, NotificationRecord, NotificationsRepository, SettingsRepository},
    service::unread_cache_service::UnreadCacheService,
    transport::{RealtimePayload, RealtimeTransport, TransportError},
};
use axum::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;

/// Broadcasts the notification to every live connection of the
/// receiver and records one delivery attempt per connection token.
pub struct WebsocketChannel {
    entities: Arc<EntityRegistry>,
    settings_repository: Arc<dyn SettingsRepository>,
    unread_cache_service: Arc<dyn UnreadCacheService>,
    repository: Arc<dyn NotificationsRepository>,
    transport: Arc<dyn RealtimeTransport>,
}

impl WebsocketChannel {
    pub fn new(
        entities: Arc<EntityRegistry>,
        settings_repository: Arc<dyn SettingsRepository>,
        unread_cache_service: Arc<dyn UnreadCacheService>,
        repository: Arc<dyn NotificationsRepository>,
        transport: Arc<dyn RealtimeTransport>,
    ) -> Self {
        Self {
            entities,
            settings_repository,
            unread_cache_service,
            repository,
            transport,
        }
    }
}

#[async_trait]
impl DeliveryChannel for WebsocketChannel {
    fn way(&self) -> DeliveryWay {
        DeliveryWay::Websocket
    }

    async fn attempt(
        &self,
        notification: &NotificationRecord,
        content: &ResolvedContent,
    ) -> Result<DeliveryOutcome, ChannelError> {
        let Some(source) = self.entities.receiver(&notification.receiver.kind) else {
            return Ok(DeliveryOutcome::Skipped);
        };

        let tokens = source.live_tokens(&notification.receiver.id).await?;
        if tokens.is_empty() {
            tracing::debug!("receiver has no live connections");
            return Ok(DeliveryOutcome::Skipped);
        }

        let count = self
            .unread_cache_service
            .unread_total(&notification.receiver)
            .await;
        let showtime = self
            .settings_repository
            .find(&notification.receiver)
            .await?
            .unwrap_or_default()
            .showtime;

        let mut delivered = 0;
        let mut last_error: Option<TransportError> = None;
        for token in tokens {
            let payload = RealtimePayload {
                id: notification.id.to_hex(),
                body: content.body.clone(),
                count,
                link: content.link.clone(),
                showtime,
            };

            let broadcast_result = self.transport.broadcast(&token, payload).await;
            let sent_result = match &broadcast_result {
                Ok(()) => "ok".to_string(),
                Err(err) => err.to_string(),
            };

            self.repository
                .insert_sending(
                    notification.id,
                    DeliveryWay::Websocket,
                    &token,
                    Some(sent_result),
                    OffsetDateTime::now_utc(),
                )
                .await?;

            match broadcast_result {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::warn!(token, err = %err, "realtime broadcast failed");
                    last_error = Some(err);
                }
            }
        }

        match (delivered, last_error) {
            (0, Some(err)) => Err(err.into()),
            _ => Ok(DeliveryOutcome::Delivered),
        }
    }
}
