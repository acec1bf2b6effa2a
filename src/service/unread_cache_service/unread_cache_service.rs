use crate::{dto::output, entity::EntityRef, error::Error, repository::NotificationRecord};
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnreadCacheService: Send + Sync {
    ///
    /// Bumps the receiver's counters for one new unread notification:
    /// ALL, the notifiable kind scope when present, and OFFICIAL when
    /// the notification is official.
    ///
    async fn increment_unread(&self, notification: &NotificationRecord);

    ///
    /// Inverse of [UnreadCacheService::increment_unread].
    /// Counters clamp at zero.
    ///
    async fn decrement_unread(&self, notification: &NotificationRecord);

    ///
    /// Receiver's current ALL counter.
    ///
    async fn unread_total(&self, receiver: &EntityRef) -> u64;

    ///
    /// Cached counters for every known notifiable kind plus the
    /// official subset. Reads the cache only, never recomputes.
    ///
    async fn unread_count_details(&self, receiver: &EntityRef) -> output::UnreadCountDetails;

    ///
    /// Recomputes every counter of the receiver from stored
    /// notifications and overwrites the cache (last writer wins).
    /// This is the source of truth recovery path.
    ///
    /// ### Returns
    /// the reconciled counters
    ///
    async fn reconcile(&self, receiver: &EntityRef) -> Result<output::UnreadCountDetails, Error>;
}
