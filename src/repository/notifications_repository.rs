use super::{
    dto::{NewNotification, NotificationRecord, SendingRecord, UnreadRollup},
    DeliveryWay, Error,
};
use crate::entity::EntityRef;
use axum::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Inserts a new notification. Notifications are created unread
    /// with no delivery attempts.
    ///
    /// ### Returns
    /// the stored record, with its assigned id
    ///
    async fn insert(
        &self,
        notification: NewNotification,
        created_at: OffsetDateTime,
    ) -> Result<NotificationRecord, Error>;

    async fn find(&self, id: ObjectId) -> Result<Option<NotificationRecord>, Error>;

    ///
    /// Sets read_at, but only when the notification is currently
    /// unread (compare and set).
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - notification is already read
    ///
    async fn mark_read(&self, id: ObjectId, read_at: OffsetDateTime) -> Result<(), Error>;

    ///
    /// Clears read_at, but only when the notification is currently
    /// read (compare and set).
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - notification is already unread
    ///
    async fn mark_unread(&self, id: ObjectId) -> Result<(), Error>;

    ///
    /// Sets sent_at, but only when it is still unset.
    ///
    /// ### Errors
    /// - [Error::NoDocumentUpdated] when
    ///     - notification does not exist
    ///     - sent_at is already set
    ///
    async fn set_sent_at(&self, id: ObjectId, sent_at: OffsetDateTime) -> Result<(), Error>;

    ///
    /// Appends a delivery record unless one already exists for
    /// (way, sent_to). Delivery records are owned by the notification.
    ///
    /// ### Returns
    /// true when a record was appended, false when the destination
    /// was already recorded
    ///
    async fn insert_sending(
        &self,
        id: ObjectId,
        way: DeliveryWay,
        sent_to: &str,
        sent_result: Option<String>,
        sent_at: OffsetDateTime,
    ) -> Result<bool, Error>;

    async fn find_sendings(&self, id: ObjectId) -> Result<Vec<SendingRecord>, Error>;

    ///
    /// Unread notifications of the receiver, newest first.
    ///
    async fn find_many_unread(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Read notifications of the receiver, newest first.
    ///
    async fn find_many_read(&self, receiver: &EntityRef)
        -> Result<Vec<NotificationRecord>, Error>;

    ///
    /// Recomputes the receiver's unread rollup from stored
    /// notifications, grouped by notifiable kind and official flag.
    ///
    async fn count_unread(&self, receiver: &EntityRef) -> Result<UnreadRollup, Error>;
}
