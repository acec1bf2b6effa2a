use crate::error::Error;
use axum::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchScheduler: Send + Sync {
    ///
    /// Queues dispatch of the notification: immediately when `at` is
    /// absent or already passed, otherwise at the given time.
    ///
    /// ### Errors
    /// - [Error::Scheduling] when the dispatch queue is closed; the
    ///   notification would never reach its recipients
    ///
    async fn schedule(&self, id: ObjectId, at: Option<OffsetDateTime>) -> Result<(), Error>;

    ///
    /// Withdraws a deferred dispatch that has not fired yet.
    ///
    /// ### Returns
    /// true when a pending dispatch was withdrawn
    ///
    async fn withdraw(&self, id: ObjectId) -> bool;
}
