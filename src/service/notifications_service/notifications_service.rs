use crate::{
    dto::{input, output},
    entity::EntityRef,
    error::Error,
};
use axum::async_trait;
use bson::oid::ObjectId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Persists a new notification, bumps the receiver's unread
    /// counters and queues dispatch (immediate, or at sending_at).
    ///
    /// ### Returns
    /// ID of the created notification
    ///
    /// ### Errors
    /// - [Error::Validation] when
    ///     - the receiver reference is empty
    ///     - the code is unknown for a registered notifiable kind
    /// - [Error::Scheduling] when dispatch could not be queued;
    ///   the notification is persisted but will not reach recipients
    ///
    async fn create_notification(
        &self,
        notification: input::Notification,
    ) -> Result<output::NotificationId, Error>;

    ///
    /// Runs every delivery channel for the notification and stamps
    /// sent_at after the first successful attempt. Channel failures
    /// never surface here.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist]
    ///
    async fn dispatch_notification(&self, id: ObjectId) -> Result<(), Error>;

    ///
    /// Marks the notification read and decrements the receiver's
    /// unread counters. Calling it twice is a no-op the second time.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist]
    ///
    async fn mark_read(&self, id: ObjectId) -> Result<(), Error>;

    ///
    /// Inverse of [NotificationsService::mark_read], idempotent the
    /// same way.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist]
    ///
    async fn mark_unread(&self, id: ObjectId) -> Result<(), Error>;

    ///
    /// Withdraws a deferred dispatch scheduled for the notification.
    ///
    /// ### Errors
    /// - [Error::NoPendingDispatch] when no deferred dispatch is
    ///   pending (never scheduled, already fired, or withdrawn)
    ///
    async fn withdraw_scheduled_dispatch(&self, id: ObjectId) -> Result<(), Error>;

    ///
    /// Receiver's cached unread counters; reads the cache only.
    ///
    async fn unread_count_details(
        &self,
        receiver: &EntityRef,
    ) -> Result<output::UnreadCountDetails, Error>;

    ///
    /// Recomputes the receiver's unread counters from stored
    /// notifications and overwrites the cache.
    ///
    async fn reconcile_unread_counts(
        &self,
        receiver: &EntityRef,
    ) -> Result<output::UnreadCountDetails, Error>;

    ///
    /// Unread notifications of the receiver with resolved content,
    /// newest first.
    ///
    async fn find_unread_notifications(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<output::Notification>, Error>;

    ///
    /// Read notifications of the receiver with resolved content,
    /// newest first.
    ///
    async fn find_read_notifications(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<output::Notification>, Error>;
}
