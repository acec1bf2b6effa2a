use crate::{
    application::ApplicationState,
    dto::{input, output},
    entity::EntityRef,
    error::Error,
    service::{notifications_service::NotificationsService, settings_service::SettingsService},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use bson::oid::ObjectId;
use std::sync::Arc;

pub fn routing() -> Router<ApplicationState> {
    Router::new()
        .route("/api/v1/notifications", post(create_notification))
        .route("/api/v1/notifications/:id/read", put(mark_read))
        .route("/api/v1/notifications/:id/unread", put(mark_unread))
        .route(
            "/api/v1/notifications/:id/schedule",
            delete(withdraw_scheduled_dispatch),
        )
        .route(
            "/api/v1/receivers/:kind/:id/notifications/unread",
            get(find_unread_notifications),
        )
        .route(
            "/api/v1/receivers/:kind/:id/notifications/read",
            get(find_read_notifications),
        )
        .route(
            "/api/v1/receivers/:kind/:id/unread_count",
            get(unread_count_details),
        )
        .route(
            "/api/v1/receivers/:kind/:id/unread_count/reconcile",
            post(reconcile_unread_counts),
        )
        .route(
            "/api/v1/receivers/:kind/:id/notification_setting",
            get(find_notification_setting).put(update_notification_setting),
        )
}

fn parse_notification_id(id: &str) -> Result<ObjectId, Error> {
    ObjectId::parse_str(id).map_err(|_| Error::Validation("invalid notification id"))
}

async fn create_notification(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Json(notification): Json<input::Notification>,
) -> Result<(StatusCode, Json<output::NotificationId>), Error> {
    let id = notifications_service
        .create_notification(notification)
        .await?;

    Ok((StatusCode::CREATED, Json(id)))
}

async fn mark_read(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_notification_id(&id)?;
    notifications_service.mark_read(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn mark_unread(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_notification_id(&id)?;
    notifications_service.mark_unread(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn withdraw_scheduled_dispatch(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    let id = parse_notification_id(&id)?;
    notifications_service.withdraw_scheduled_dispatch(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_unread_notifications(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Vec<output::Notification>>, Error> {
    let notifications = notifications_service
        .find_unread_notifications(&EntityRef::new(kind, id))
        .await?;

    Ok(Json(notifications))
}

async fn find_read_notifications(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Vec<output::Notification>>, Error> {
    let notifications = notifications_service
        .find_read_notifications(&EntityRef::new(kind, id))
        .await?;

    Ok(Json(notifications))
}

async fn unread_count_details(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<output::UnreadCountDetails>, Error> {
    let details = notifications_service
        .unread_count_details(&EntityRef::new(kind, id))
        .await?;

    Ok(Json(details))
}

async fn reconcile_unread_counts(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<output::UnreadCountDetails>, Error> {
    let details = notifications_service
        .reconcile_unread_counts(&EntityRef::new(kind, id))
        .await?;

    Ok(Json(details))
}

async fn find_notification_setting(
    State(settings_service): State<Arc<dyn SettingsService>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<output::NotificationSetting>, Error> {
    let setting = settings_service
        .find_setting(&EntityRef::new(kind, id))
        .await?;

    Ok(Json(setting))
}

async fn update_notification_setting(
    State(settings_service): State<Arc<dyn SettingsService>>,
    Path((kind, id)): Path<(String, String)>,
    Json(setting): Json<input::NotificationSetting>,
) -> Result<StatusCode, Error> {
    settings_service
        .update_setting(&EntityRef::new(kind, id), setting)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
