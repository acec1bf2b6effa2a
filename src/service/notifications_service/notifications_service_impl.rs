use super::NotificationsService;
use crate::{
    content::{CategoryRegistry, ContentResolver, DEFAULT_CODE},
    dto::{input, output},
    entity::EntityRef,
    error::Error,
    repository::{self, NotificationRecord, NotificationsRepository},
    service::{
        delivery_service::DeliveryService, scheduler_service::DispatchScheduler,
        unread_cache_service::UnreadCacheService,
    },
};
use axum::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use time::OffsetDateTime;

pub struct NotificationsServiceImpl {
    repository: Arc<dyn NotificationsRepository>,
    unread_cache_service: Arc<dyn UnreadCacheService>,
    delivery_service: Arc<dyn DeliveryService>,
    dispatch_scheduler: Arc<dyn DispatchScheduler>,
    content_resolver: Arc<ContentResolver>,
    category_registry: Arc<CategoryRegistry>,
}

impl NotificationsServiceImpl {
    pub fn new(
        repository: Arc<dyn NotificationsRepository>,
        unread_cache_service: Arc<dyn UnreadCacheService>,
        delivery_service: Arc<dyn DeliveryService>,
        dispatch_scheduler: Arc<dyn DispatchScheduler>,
        content_resolver: Arc<ContentResolver>,
        category_registry: Arc<CategoryRegistry>,
    ) -> Self {
        Self {
            repository,
            unread_cache_service,
            delivery_service,
            dispatch_scheduler,
            content_resolver,
            category_registry,
        }
    }

    fn validate_create(&self, notification: &input::Notification) -> Result<(), Error> {
        if notification.receiver.kind.is_empty() || notification.receiver.id.is_empty() {
            return Err(Error::Validation("receiver reference is empty"));
        }
        if notification.code.is_empty() {
            return Err(Error::Validation("code is empty"));
        }

        // Codes are only validated against registered notifiable
        // kinds; unregistered kinds fall back to the default config.
        if let Some(notifiable) = &notification.notifiable {
            if self.category_registry.is_registered(&notifiable.kind)
                && notification.code != DEFAULT_CODE
                && !self
                    .category_registry
                    .has_code(&notifiable.kind, &notification.code)
            {
                return Err(Error::Validation("unknown code"));
            }
        }

        Ok(())
    }

    async fn render(&self, record: NotificationRecord) -> Result<output::Notification, Error> {
        let content = self.content_resolver.resolve(&record).await?;

        Ok(output::Notification {
            id: record.id.to_hex(),
            receiver: record.receiver,
            sender: record.sender,
            notifiable: record.notifiable,
            code: record.code,
            title: content.title,
            body: content.body,
            link: content.link,
            attributes: content.attributes,
            official: record.official,
            created_at: record.created_at,
            read_at: record.read_at,
            sent_at: record.sent_at,
            sending_at: record.sending_at,
        })
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    async fn create_notification(
        &self,
        notification: input::Notification,
    ) -> Result<output::NotificationId, Error> {
        tracing::info!("creating notification");
        tracing::trace!(?notification);

        self.validate_create(&notification)?;

        let record = self
            .repository
            .insert(notification.into(), OffsetDateTime::now_utc())
            .await?;

        let id = record.id.to_hex();
        tracing::info!(id, "created notification");

        self.unread_cache_service.increment_unread(&record).await;

        self.dispatch_scheduler
            .schedule(record.id, record.sending_at)
            .await
            .map_err(|err| {
                tracing::error!(id = record.id.to_hex(), err = %err, "scheduling dispatch failed");
                err
            })?;

        Ok(output::NotificationId { id })
    }

    async fn dispatch_notification(&self, id: ObjectId) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "dispatching notification");

        let notification = self
            .repository
            .find(id)
            .await?
            .ok_or(Error::NotificationNotExist)?;

        let report = self.delivery_service.deliver(&notification).await;
        tracing::info!(
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "delivery channels finished",
        );

        if report.delivered > 0 {
            match self
                .repository
                .set_sent_at(id, OffsetDateTime::now_utc())
                .await
            {
                Ok(()) => {}
                // sent_at is stamped once, re-dispatch leaves it untouched
                Err(repository::Error::NoDocumentUpdated) => {}
                Err(err) => return Err(Error::Database(err)),
            }
        } else if report.all_failed_retryable() {
            tracing::warn!(
                id = id.to_hex(),
                "every channel failed with a retryable error, notification stays dispatch pending",
            );
        }

        Ok(())
    }

    async fn mark_read(&self, id: ObjectId) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "marking notification read");

        let notification = self
            .repository
            .find(id)
            .await?
            .ok_or(Error::NotificationNotExist)?;

        if notification.read_at.is_some() {
            tracing::debug!("notification already read");
            return Ok(());
        }

        match self
            .repository
            .mark_read(id, OffsetDateTime::now_utc())
            .await
        {
            Ok(()) => {
                self.unread_cache_service
                    .decrement_unread(&notification)
                    .await;
                tracing::info!("marked notification read");
                Ok(())
            }
            // lost the race against a concurrent mark read; the
            // winner already adjusted the counters
            Err(repository::Error::NoDocumentUpdated) => Ok(()),
            Err(err) => Err(Error::Database(err)),
        }
    }

    async fn mark_unread(&self, id: ObjectId) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "marking notification unread");

        let notification = self
            .repository
            .find(id)
            .await?
            .ok_or(Error::NotificationNotExist)?;

        if notification.read_at.is_none() {
            tracing::debug!("notification already unread");
            return Ok(());
        }

        match self.repository.mark_unread(id).await {
            Ok(()) => {
                self.unread_cache_service
                    .increment_unread(&notification)
                    .await;
                tracing::info!("marked notification unread");
                Ok(())
            }
            Err(repository::Error::NoDocumentUpdated) => Ok(()),
            Err(err) => Err(Error::Database(err)),
        }
    }

    async fn withdraw_scheduled_dispatch(&self, id: ObjectId) -> Result<(), Error> {
        tracing::info!(id = id.to_hex(), "withdrawing scheduled dispatch");

        match self.dispatch_scheduler.withdraw(id).await {
            true => Ok(()),
            false => Err(Error::NoPendingDispatch),
        }
    }

    async fn unread_count_details(
        &self,
        receiver: &EntityRef,
    ) -> Result<output::UnreadCountDetails, Error> {
        Ok(self.unread_cache_service.unread_count_details(receiver).await)
    }

    async fn reconcile_unread_counts(
        &self,
        receiver: &EntityRef,
    ) -> Result<output::UnreadCountDetails, Error> {
        self.unread_cache_service.reconcile(receiver).await
    }

    async fn find_unread_notifications(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<output::Notification>, Error> {
        tracing::info!(%receiver, "finding unread notifications");

        let records = self.repository.find_many_unread(receiver).await?;
        tracing::info!(count = records.len(), "found notifications");

        let mut notifications = Vec::with_capacity(records.len());
        for record in records {
            notifications.push(self.render(record).await?);
        }

        Ok(notifications)
    }

    async fn find_read_notifications(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<output::Notification>, Error> {
        tracing::info!(%receiver, "finding read notifications");

        let records = self.repository.find_many_read(receiver).await?;
        tracing::info!(count = records.len(), "found notifications");

        let mut notifications = Vec::with_capacity(records.len());
        for record in records {
            notifications.push(self.render(record).await?);
        }

        Ok(notifications)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        content::{CategoryConfig, ContentResolverConfig, StaticTranslations},
        entity::{EntityRegistry, MockReceiverSource},
        repository::{DeliveryWay, MockNotificationsRepository, MockSettingsRepository},
        service::{
            delivery_service::{
                DeliveryReport, DeliveryServiceImpl, MockDeliveryService, WebsocketChannel,
            },
            scheduler_service::MockDispatchScheduler,
            unread_cache_service::{
                InMemoryCounterStore, MockUnreadCacheService, UnreadCacheServiceConfig,
                UnreadCacheServiceImpl,
            },
        },
        test_support::InMemoryNotificationsRepository,
        transport::MockRealtimeTransport,
    };
    use std::time::Duration;

    fn receiver() -> EntityRef {
        EntityRef::new("user", "1")
    }

    fn create_input(notifiable: Option<EntityRef>) -> input::Notification {
        input::Notification {
            receiver: receiver(),
            sender: None,
            notifiable,
            linked: None,
            code: "default".to_string(),
            official: false,
            verbose: false,
            sending_at: None,
            title: None,
            body: None,
            link: None,
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

    struct ServiceBuilder {
        repository: Arc<dyn NotificationsRepository>,
        unread_cache_service: Arc<dyn UnreadCacheService>,
        delivery_service: Arc<dyn DeliveryService>,
        dispatch_scheduler: Arc<dyn DispatchScheduler>,
        category_registry: Arc<CategoryRegistry>,
    }

    impl ServiceBuilder {
        fn new() -> Self {
            let mut unread_cache_service = MockUnreadCacheService::new();
            unread_cache_service
                .expect_increment_unread()
                .returning(|_| ());
            unread_cache_service
                .expect_decrement_unread()
                .returning(|_| ());

            let mut dispatch_scheduler = MockDispatchScheduler::new();
            dispatch_scheduler.expect_schedule().returning(|_, _| Ok(()));

            Self {
                repository: Arc::new(InMemoryNotificationsRepository::new()),
                unread_cache_service: Arc::new(unread_cache_service),
                delivery_service: Arc::new(MockDeliveryService::new()),
                dispatch_scheduler: Arc::new(dispatch_scheduler),
                category_registry: Arc::new(CategoryRegistry::new()),
            }
        }

        fn build(self) -> NotificationsServiceImpl {
            NotificationsServiceImpl::new(
                self.repository,
                self.unread_cache_service,
                self.delivery_service,
                self.dispatch_scheduler,
                content_resolver(),
                self.category_registry,
            )
        }
    }

    #[tokio::test]
    async fn create_notification_empty_receiver_is_rejected() {
        let service = ServiceBuilder::new().build();

        let mut notification = create_input(None);
        notification.receiver = EntityRef::new("", "1");

        let result = service.create_notification(notification).await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn create_notification_unknown_code_for_registered_kind_is_rejected() {
        let mut category_registry = CategoryRegistry::new();
        category_registry.register("order", "shipped", CategoryConfig::default());

        let mut builder = ServiceBuilder::new();
        builder.category_registry = Arc::new(category_registry);
        let service = builder.build();

        let mut notification = create_input(Some(EntityRef::new("order", "42")));
        notification.code = "cancelled".to_string();

        let result = service.create_notification(notification).await;

        assert!(matches!(result, Err(Error::Validation("unknown code"))));
    }

    #[tokio::test]
    async fn create_notification_unknown_code_for_unregistered_kind_is_accepted() {
        let service = ServiceBuilder::new().build();

        let mut notification = create_input(Some(EntityRef::new("invoice", "7")));
        notification.code = "anything".to_string();

        let result = service.create_notification(notification).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_notification_increments_cache_and_schedules() {
        let mut unread_cache_service = MockUnreadCacheService::new();
        unread_cache_service
            .expect_increment_unread()
            .withf(|notification| {
                notification.receiver.id == "1"
                    && notification.notifiable_kind() == Some("order")
                    && notification.official
            })
            .times(1)
            .returning(|_| ());

        let mut dispatch_scheduler = MockDispatchScheduler::new();
        dispatch_scheduler
            .expect_schedule()
            .withf(|_, at| at.is_none())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut builder = ServiceBuilder::new();
        builder.unread_cache_service = Arc::new(unread_cache_service);
        builder.dispatch_scheduler = Arc::new(dispatch_scheduler);
        let service = builder.build();

        let mut notification = create_input(Some(EntityRef::new("order", "42")));
        notification.official = true;

        let result = service.create_notification(notification).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_notification_deferred_passes_sending_at_to_scheduler() {
        let sending_at = OffsetDateTime::now_utc() + Duration::from_secs(600);

        let mut dispatch_scheduler = MockDispatchScheduler::new();
        dispatch_scheduler
            .expect_schedule()
            .withf(move |_, at| *at == Some(sending_at))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut builder = ServiceBuilder::new();
        builder.dispatch_scheduler = Arc::new(dispatch_scheduler);
        let service = builder.build();

        let mut notification = create_input(None);
        notification.sending_at = Some(sending_at);

        let result = service.create_notification(notification).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_notification_scheduling_failure_propagates() {
        let mut dispatch_scheduler = MockDispatchScheduler::new();
        dispatch_scheduler
            .expect_schedule()
            .returning(|_, _| Err(Error::Scheduling("dispatch queue closed")));

        let mut builder = ServiceBuilder::new();
        builder.dispatch_scheduler = Arc::new(dispatch_scheduler);
        let service = builder.build();

        let result = service.create_notification(create_input(None)).await;

        assert!(matches!(result, Err(Error::Scheduling(_))));
    }

    #[tokio::test]
    async fn dispatch_notification_not_exist() {
        let service = ServiceBuilder::new().build();

        let result = service.dispatch_notification(ObjectId::new()).await;

        assert!(matches!(result, Err(Error::NotificationNotExist)));
    }

    #[tokio::test]
    async fn dispatch_notification_stamps_sent_at_once() {
        let repository = Arc::new(InMemoryNotificationsRepository::new());

        let mut delivery_service = MockDeliveryService::new();
        delivery_service.expect_deliver().returning(|_| DeliveryReport {
            delivered: 1,
            ..Default::default()
        });

        let mut builder = ServiceBuilder::new();
        builder.repository = repository.clone();
        builder.delivery_service = Arc::new(delivery_service);
        let service = builder.build();

        let id = service
            .create_notification(create_input(None))
            .await
            .unwrap()
            .id;
        let id = ObjectId::parse_str(&id).unwrap();

        service.dispatch_notification(id).await.unwrap();
        let first_sent_at = repository.find(id).await.unwrap().unwrap().sent_at;
        assert!(first_sent_at.is_some());

        // re-dispatch leaves the original stamp untouched
        service.dispatch_notification(id).await.unwrap();
        let second_sent_at = repository.find(id).await.unwrap().unwrap().sent_at;
        assert_eq!(second_sent_at, first_sent_at);
    }

    #[tokio::test]
    async fn dispatch_notification_without_delivery_leaves_sent_at_unset() {
        let repository = Arc::new(InMemoryNotificationsRepository::new());

        let mut delivery_service = MockDeliveryService::new();
        delivery_service.expect_deliver().returning(|_| DeliveryReport {
            failed: 2,
            retryable_failures: 2,
            ..Default::default()
        });

        let mut builder = ServiceBuilder::new();
        builder.repository = repository.clone();
        builder.delivery_service = Arc::new(delivery_service);
        let service = builder.build();

        let id = service
            .create_notification(create_input(None))
            .await
            .unwrap()
            .id;
        let id = ObjectId::parse_str(&id).unwrap();

        service.dispatch_notification(id).await.unwrap();

        let sent_at = repository.find(id).await.unwrap().unwrap().sent_at;
        assert!(sent_at.is_none());
    }

    #[tokio::test]
    async fn mark_read_not_exist() {
        let service = ServiceBuilder::new().build();

        let result = service.mark_read(ObjectId::new()).await;

        assert!(matches!(result, Err(Error::NotificationNotExist)));
    }

    #[tokio::test]
    async fn mark_read_decrements_once_when_called_twice() {
        let mut unread_cache_service = MockUnreadCacheService::new();
        unread_cache_service
            .expect_increment_unread()
            .returning(|_| ());
        unread_cache_service
            .expect_decrement_unread()
            .times(1)
            .returning(|_| ());

        let mut builder = ServiceBuilder::new();
        builder.unread_cache_service = Arc::new(unread_cache_service);
        let repository = Arc::new(InMemoryNotificationsRepository::new());
        builder.repository = repository.clone();
        let service = builder.build();

        let id = service
            .create_notification(create_input(None))
            .await
            .unwrap()
            .id;
        let id = ObjectId::parse_str(&id).unwrap();

        service.mark_read(id).await.unwrap();
        service.mark_read(id).await.unwrap();

        assert!(repository.find(id).await.unwrap().unwrap().read_at.is_some());
    }

    #[tokio::test]
    async fn mark_read_lost_race_does_not_decrement() {
        let record = NotificationRecord {
            id: ObjectId::new(),
            receiver: receiver(),
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
        };
        let id = record.id;

        let mut repository = MockNotificationsRepository::new();
        repository
            .expect_find()
            .returning(move |_| Ok(Some(record.clone())));
        repository
            .expect_mark_read()
            .returning(|_, _| Err(repository::Error::NoDocumentUpdated));

        let mut unread_cache_service = MockUnreadCacheService::new();
        unread_cache_service.expect_decrement_unread().never();

        let mut builder = ServiceBuilder::new();
        builder.repository = Arc::new(repository);
        builder.unread_cache_service = Arc::new(unread_cache_service);
        let service = builder.build();

        let result = service.mark_read(id).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn mark_unread_is_idempotent() {
        let mut unread_cache_service = MockUnreadCacheService::new();
        // one increment from create, one from mark_unread
        unread_cache_service
            .expect_increment_unread()
            .times(2)
            .returning(|_| ());
        unread_cache_service
            .expect_decrement_unread()
            .times(1)
            .returning(|_| ());

        let mut builder = ServiceBuilder::new();
        builder.unread_cache_service = Arc::new(unread_cache_service);
        let service = builder.build();

        let id = service
            .create_notification(create_input(None))
            .await
            .unwrap()
            .id;
        let id = ObjectId::parse_str(&id).unwrap();

        service.mark_read(id).await.unwrap();
        service.mark_unread(id).await.unwrap();
        service.mark_unread(id).await.unwrap();
    }

    #[tokio::test]
    async fn withdraw_scheduled_dispatch_not_pending() {
        let mut dispatch_scheduler = MockDispatchScheduler::new();
        dispatch_scheduler.expect_withdraw().returning(|_| false);

        let mut builder = ServiceBuilder::new();
        builder.dispatch_scheduler = Arc::new(dispatch_scheduler);
        let service = builder.build();

        let result = service.withdraw_scheduled_dispatch(ObjectId::new()).await;

        assert!(matches!(result, Err(Error::NoPendingDispatch)));
    }

    #[tokio::test]
    async fn withdraw_scheduled_dispatch_pending() {
        let mut dispatch_scheduler = MockDispatchScheduler::new();
        dispatch_scheduler.expect_withdraw().returning(|_| true);

        let mut builder = ServiceBuilder::new();
        builder.dispatch_scheduler = Arc::new(dispatch_scheduler);
        let service = builder.build();

        let result = service.withdraw_scheduled_dispatch(ObjectId::new()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn find_unread_notifications_newest_first_with_resolved_links() {
        let repository = Arc::new(InMemoryNotificationsRepository::new());
        let mut builder = ServiceBuilder::new();
        builder.repository = repository.clone();
        let service = builder.build();

        let first = service
            .create_notification(create_input(None))
            .await
            .unwrap()
            .id;
        let second = service
            .create_notification(create_input(None))
            .await
            .unwrap()
            .id;

        let notifications = service.find_unread_notifications(&receiver()).await.unwrap();

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].id, second);
        assert_eq!(notifications[1].id, first);
        assert_eq!(
            notifications[0].link,
            format!("https://notice.example.com/notifications/{second}")
        );
    }

    // Cache consistency across the whole lifecycle, against a live
    // cache and repository pair.
    fn lifecycle_service(
        repository: Arc<InMemoryNotificationsRepository>,
    ) -> NotificationsServiceImpl {
        let counter_store = Arc::new(InMemoryCounterStore::new());
        let unread_cache_service = Arc::new(UnreadCacheServiceImpl::new(
            UnreadCacheServiceConfig { drift_threshold: 0 },
            counter_store,
            repository.clone(),
            vec!["order".to_string()],
        ));

        let mut dispatch_scheduler = MockDispatchScheduler::new();
        dispatch_scheduler.expect_schedule().returning(|_, _| Ok(()));

        NotificationsServiceImpl::new(
            repository,
            unread_cache_service,
            Arc::new(MockDeliveryService::new()),
            Arc::new(dispatch_scheduler),
            content_resolver(),
            Arc::new(CategoryRegistry::new()),
        )
    }

    #[tokio::test]
    async fn unread_counters_match_storage_after_lifecycle_and_reconcile() {
        let repository = Arc::new(InMemoryNotificationsRepository::new());
        let service = lifecycle_service(repository.clone());

        let mut ids = Vec::new();
        for i in 0..4 {
            let mut notification = create_input(Some(EntityRef::new("order", i.to_string())));
            notification.official = i % 2 == 0;
            let id = service.create_notification(notification).await.unwrap().id;
            ids.push(ObjectId::parse_str(&id).unwrap());
        }

        service.mark_read(ids[0]).await.unwrap();
        service.mark_read(ids[1]).await.unwrap();
        service.mark_unread(ids[1]).await.unwrap();

        let details = service.unread_count_details(&receiver()).await.unwrap();
        assert_eq!(details.all, 3);
        assert_eq!(details.kinds.get("order"), Some(&3));
        assert_eq!(details.official, 1);
        assert_eq!(details.all, repository.stored_unread_count(&receiver()).await);

        let reconciled = service.reconcile_unread_counts(&receiver()).await.unwrap();
        assert_eq!(reconciled, details);
    }

    #[tokio::test]
    async fn mark_read_round_trip_restores_counters() {
        let repository = Arc::new(InMemoryNotificationsRepository::new());
        let service = lifecycle_service(repository.clone());

        let mut notification = create_input(Some(EntityRef::new("order", "42")));
        notification.official = true;
        let id = service.create_notification(notification).await.unwrap().id;
        let id = ObjectId::parse_str(&id).unwrap();

        let before = service.unread_count_details(&receiver()).await.unwrap();

        service.mark_read(id).await.unwrap();
        service.mark_unread(id).await.unwrap();

        let after = service.unread_count_details(&receiver()).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn concurrent_creates_increment_all_by_exactly_two() {
        let repository = Arc::new(InMemoryNotificationsRepository::new());
        let service = Arc::new(lifecycle_service(repository.clone()));

        let tasks = (0..2)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service.create_notification(create_input(None)).await.unwrap()
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap();
        }

        let details = service.unread_count_details(&receiver()).await.unwrap();
        assert_eq!(details.all, 2);
    }

    #[tokio::test]
    async fn repeated_dispatch_keeps_one_sending_per_destination() {
        let repository = Arc::new(InMemoryNotificationsRepository::new());

        let mut receiver_source = MockReceiverSource::new();
        receiver_source
            .expect_live_tokens()
            .returning(|_| Ok(vec!["token-1".to_string()]));
        let mut entities = EntityRegistry::new();
        entities.register_receiver("user", Arc::new(receiver_source));

        let mut settings_repository = MockSettingsRepository::new();
        settings_repository.expect_find().returning(|_| Ok(None));

        let mut unread_cache_service = MockUnreadCacheService::new();
        unread_cache_service.expect_unread_total().returning(|_| 1);
        unread_cache_service
            .expect_increment_unread()
            .returning(|_| ());

        let unread_cache_service = Arc::new(unread_cache_service);

        let mut transport = MockRealtimeTransport::new();
        transport.expect_broadcast().returning(|_, _| Ok(()));

        let websocket_channel = WebsocketChannel::new(
            Arc::new(entities),
            Arc::new(settings_repository),
            unread_cache_service.clone(),
            repository.clone(),
            Arc::new(transport),
        );
        let delivery_service = Arc::new(DeliveryServiceImpl::new(
            content_resolver(),
            vec![Arc::new(websocket_channel)],
        ));

        let mut dispatch_scheduler = MockDispatchScheduler::new();
        dispatch_scheduler.expect_schedule().returning(|_, _| Ok(()));

        let service = NotificationsServiceImpl::new(
            repository.clone(),
            unread_cache_service,
            delivery_service,
            Arc::new(dispatch_scheduler),
            content_resolver(),
            Arc::new(CategoryRegistry::new()),
        );

        let id = service
            .create_notification(create_input(None))
            .await
            .unwrap()
            .id;
        let id = ObjectId::parse_str(&id).unwrap();

        service.dispatch_notification(id).await.unwrap();
        service.dispatch_notification(id).await.unwrap();

        let sendings = repository.find_sendings(id).await.unwrap();
        assert_eq!(sendings.len(), 1);
        assert_eq!(sendings[0].way, DeliveryWay::Websocket);
        assert_eq!(sendings[0].sent_to, "token-1");
    }
}
