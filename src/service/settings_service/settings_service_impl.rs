use super::SettingsService;
use crate::{
    dto::{input, output},
    entity::EntityRef,
    error::Error,
    repository::{SettingRecord, SettingsRepository},
};
use axum::async_trait;
use std::sync::Arc;

pub struct SettingsServiceImpl {
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsServiceImpl {
    pub fn new(repository: Arc<dyn SettingsRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl SettingsService for SettingsServiceImpl {
    async fn find_setting(
        &self,
        receiver: &EntityRef,
    ) -> Result<output::NotificationSetting, Error> {
        let setting = self
            .repository
            .find(receiver)
            .await?
            .unwrap_or_default();

        Ok(setting.into())
    }

    async fn update_setting(
        &self,
        receiver: &EntityRef,
        setting: input::NotificationSetting,
    ) -> Result<(), Error> {
        tracing::info!(%receiver, "updating notification setting");

        self.repository
            .upsert(
                receiver,
                SettingRecord {
                    showtime: setting.showtime,
                    accept_email: setting.accept_email,
                },
            )
            .await?;

        tracing::info!(%receiver, "updated notification setting");

        Ok(())
    }
}
