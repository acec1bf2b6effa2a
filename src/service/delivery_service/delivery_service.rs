use crate::repository::NotificationRecord;
use axum::async_trait;

/// Outcome of one multi channel dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
    pub retryable_failures: usize,
}

impl DeliveryReport {
    /// Nothing went out and every failure was retryable; the
    /// notification stays dispatch pending.
    pub fn all_failed_retryable(&self) -> bool {
        self.delivered == 0 && self.failed > 0 && self.failed == self.retryable_failures
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryService: Send + Sync {
    ///
    /// Attempts every configured channel. Channel failures are
    /// isolated from each other, logged and reflected in the report,
    /// never returned as errors.
    ///
    async fn deliver(&self, notification: &NotificationRecord) -> DeliveryReport;
}
