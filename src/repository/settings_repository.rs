use super::{dto::SettingRecord, Error};
use crate::entity::EntityRef;
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find(&self, receiver: &EntityRef) -> Result<Option<SettingRecord>, Error>;

    ///
    /// Creates or replaces the receiver's setting.
    ///
    async fn upsert(&self, receiver: &EntityRef, setting: SettingRecord) -> Result<(), Error>;
}
