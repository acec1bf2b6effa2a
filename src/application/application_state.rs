use super::ApplicationEnv;
use crate::{
    content::{CategoryRegistry, ContentResolver, ContentResolverConfig, StaticTranslations},
    entity::EntityRegistry,
    repository::{NotificationsRepositoryImpl, SettingsRepositoryImpl},
    service::{
        delivery_service::{
            DeliveryChannel, DeliveryServiceImpl, EmailChannel, EmailChannelConfig, PushChannel,
            WebsocketChannel,
        },
        notifications_service::{NotificationsService, NotificationsServiceImpl},
        scheduler_service::{DispatchWorker, TokioDispatchScheduler},
        settings_service::{SettingsService, SettingsServiceImpl},
        unread_cache_service::{
            InMemoryCounterStore, UnreadCacheServiceConfig, UnreadCacheServiceImpl,
        },
    },
    transport::{LoggingEmailTransport, LoggingPushTransport, LoggingRealtimeTransport},
};
use axum::extract::FromRef;
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;
use tokio::{sync::Notify, task::JoinHandle};

#[derive(Clone, FromRef)]
pub struct ApplicationState {
    pub notifications_service: Arc<dyn NotificationsService>,
    pub settings_service: Arc<dyn SettingsService>,
}

pub struct ApplicationStateToClose {
    pub db_client: Client,
    pub dispatch_worker_close: Arc<Notify>,
    pub dispatch_worker: JoinHandle<()>,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("connecting to database");
    let db_client_options = ClientOptions::parse(&env.db_connection_string).await?;
    let db_client = Client::with_options(db_client_options)?;
    let db = db_client.database(&env.db_name);

    tracing::info!("creating repositories");
    let notifications_repository = NotificationsRepositoryImpl::new(db.clone()).await?;
    let notifications_repository = Arc::new(notifications_repository);
    let settings_repository = SettingsRepositoryImpl::new(db).await?;
    let settings_repository = Arc::new(settings_repository);

    tracing::info!("creating registries");
    // Host applications register their entity sources and category
    // configurations here before the server starts.
    let entity_registry = Arc::new(EntityRegistry::new());
    let category_registry = Arc::new(CategoryRegistry::new());
    let translations = Arc::new(StaticTranslations::new());

    tracing::info!("creating services");
    let content_resolver = Arc::new(ContentResolver::new(
        ContentResolverConfig {
            link_host: env.link_host.clone(),
        },
        category_registry.clone(),
        entity_registry.clone(),
        translations,
    ));

    let counter_store = Arc::new(InMemoryCounterStore::new());
    let known_kinds = entity_registry
        .notifiable_kinds()
        .map(str::to_string)
        .collect();
    let unread_cache_service = Arc::new(UnreadCacheServiceImpl::new(
        UnreadCacheServiceConfig {
            drift_threshold: env.cache_drift_threshold,
        },
        counter_store,
        notifications_repository.clone(),
        known_kinds,
    ));

    let websocket_channel = WebsocketChannel::new(
        entity_registry.clone(),
        settings_repository.clone(),
        unread_cache_service.clone(),
        notifications_repository.clone(),
        Arc::new(LoggingRealtimeTransport),
    );
    let email_channel = EmailChannel::new(
        EmailChannelConfig {
            default_send_email: env.default_send_email,
        },
        settings_repository.clone(),
        Arc::new(LoggingEmailTransport),
    );
    let push_channel = PushChannel::new(entity_registry, Arc::new(LoggingPushTransport));
    let channels: Vec<Arc<dyn DeliveryChannel>> = vec![
        Arc::new(websocket_channel),
        Arc::new(email_channel),
        Arc::new(push_channel),
    ];
    let delivery_service = Arc::new(DeliveryServiceImpl::new(
        content_resolver.clone(),
        channels,
    ));

    let (dispatch_scheduler, dispatch_queue) = TokioDispatchScheduler::new();
    let dispatch_scheduler = Arc::new(dispatch_scheduler);

    let notifications_service: Arc<dyn NotificationsService> = Arc::new(
        NotificationsServiceImpl::new(
            notifications_repository,
            unread_cache_service,
            delivery_service,
            dispatch_scheduler,
            content_resolver,
            category_registry,
        ),
    );

    let settings_service: Arc<dyn SettingsService> =
        Arc::new(SettingsServiceImpl::new(settings_repository));

    tracing::info!("starting dispatch worker");
    let dispatch_worker_close = Arc::new(Notify::new());
    let dispatch_worker = DispatchWorker::new(dispatch_queue, notifications_service.clone());
    let dispatch_worker = tokio::spawn(dispatch_worker.run(dispatch_worker_close.clone()));

    Ok((
        ApplicationState {
            notifications_service,
            settings_service,
        },
        ApplicationStateToClose {
            db_client,
            dispatch_worker_close,
            dispatch_worker,
        },
    ))
}
