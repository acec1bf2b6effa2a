use super::{DeliveryChannel, DeliveryOutcome, DeliveryReport, DeliveryService};
use crate::{content::ContentResolver, repository::NotificationRecord};
use axum::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;

/// Ordered pipeline of independent delivery channels. Channels run
/// concurrently, none serializes behind or aborts another.
pub struct DeliveryServiceImpl {
    content_resolver: Arc<ContentResolver>,
    channels: Vec<Arc<dyn DeliveryChannel>>,
}

impl DeliveryServiceImpl {
    pub fn new(
        content_resolver: Arc<ContentResolver>,
        channels: Vec<Arc<dyn DeliveryChannel>>,
    ) -> Self {
        Self {
            content_resolver,
            channels,
        }
    }
}

#[async_trait]
impl DeliveryService for DeliveryServiceImpl {
    async fn deliver(&self, notification: &NotificationRecord) -> DeliveryReport {
        let content = match self.content_resolver.resolve(notification).await {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(err = %err, "content resolution failed, no channel attempted");
                return DeliveryReport {
                    failed: self.channels.len(),
                    retryable_failures: self.channels.len(),
                    ..Default::default()
                };
            }
        };

        let attempts = self.channels.iter().map(|channel| {
            let content = &content;
            async move { (channel.way(), channel.attempt(notification, content).await) }
        });

        let mut report = DeliveryReport::default();
        for (way, outcome) in join_all(attempts).await {
            match outcome {
                Ok(DeliveryOutcome::Delivered) => report.delivered += 1,
                Ok(DeliveryOutcome::Skipped) => report.skipped += 1,
                Err(err) => {
                    report.failed += 1;
                    if err.is_retryable() {
                        report.retryable_failures += 1;
                    }
                    tracing::warn!(%way, err = %err, "delivery channel failed");
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        content::{CategoryRegistry, ContentResolverConfig, StaticTranslations},
        entity::{EntityRef, EntityRegistry},
        repository::DeliveryWay,
        service::delivery_service::{ChannelError, MockDeliveryChannel},
        transport::TransportError,
    };
    use bson::oid::ObjectId;
    use time::OffsetDateTime;

    fn notification() -> NotificationRecord {
        NotificationRecord {
            id: ObjectId::new(),
            receiver: EntityRef::new("user", "1"),
            sender: None,
            notifiable: None,
            linked: None,
            code: "default".to_string(),
            title: None,
            body: None,
            link: None,
            official: false,
            verbose: false,
            created_at: OffsetDateTime::now_utc(),
            read_at: None,
            sent_at: None,
            sending_at: None,
        }
    }

    fn content_resolver() -> Arc<ContentResolver> {
        Arc::new(ContentResolver::new(
            ContentResolverConfig {
                link_host: "https://notice.example.com".to_string(),
            },
            Arc::new(CategoryRegistry::new()),
            Arc::new(EntityRegistry::new()),
            Arc::new(StaticTranslations::new()),
        ))
    }

    fn channel(
        way: DeliveryWay,
        outcome: impl Fn() -> Result<DeliveryOutcome, ChannelError> + Send + Sync + 'static,
    ) -> Arc<dyn DeliveryChannel> {
        let mut channel = MockDeliveryChannel::new();
        channel.expect_way().return_const(way);
        channel.expect_attempt().returning(move |_, _| outcome());
        Arc::new(channel)
    }

    #[tokio::test]
    async fn failed_channel_does_not_block_others() {
        let service = DeliveryServiceImpl::new(
            content_resolver(),
            vec![
                channel(DeliveryWay::Websocket, || {
                    Err(ChannelError::Transport(TransportError::retryable(
                        "gateway down",
                    )))
                }),
                channel(DeliveryWay::Email, || Ok(DeliveryOutcome::Delivered)),
                channel(DeliveryWay::Push, || Ok(DeliveryOutcome::Skipped)),
            ],
        );

        let report = service.deliver(&notification()).await;

        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.all_failed_retryable());
    }

    #[tokio::test]
    async fn all_channels_failed_retryable() {
        let service = DeliveryServiceImpl::new(
            content_resolver(),
            vec![
                channel(DeliveryWay::Websocket, || {
                    Err(ChannelError::Transport(TransportError::retryable("down")))
                }),
                channel(DeliveryWay::Email, || {
                    Err(ChannelError::Transport(TransportError::retryable("down")))
                }),
            ],
        );

        let report = service.deliver(&notification()).await;

        assert_eq!(report.failed, 2);
        assert!(report.all_failed_retryable());
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retryable() {
        let service = DeliveryServiceImpl::new(
            content_resolver(),
            vec![channel(DeliveryWay::Push, || {
                Err(ChannelError::Transport(TransportError::permanent(
                    "invalid token",
                )))
            })],
        );

        let report = service.deliver(&notification()).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.retryable_failures, 0);
        assert!(!report.all_failed_retryable());
    }

    #[tokio::test]
    async fn no_channels_is_an_empty_report() {
        let service = DeliveryServiceImpl::new(content_resolver(), vec![]);

        let report = service.deliver(&notification()).await;

        assert_eq!(report, DeliveryReport::default());
    }
}
