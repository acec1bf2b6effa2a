use crate::{
    dto::{input, output},
    entity::EntityRef,
    error::Error,
};
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsService: Send + Sync {
    ///
    /// Receiver's notification setting; defaults when none is stored
    /// (showtime off, accept_email unset).
    ///
    async fn find_setting(&self, receiver: &EntityRef)
        -> Result<output::NotificationSetting, Error>;

    ///
    /// Creates or replaces the receiver's notification setting.
    ///
    async fn update_setting(
        &self,
        receiver: &EntityRef,
        setting: input::NotificationSetting,
    ) -> Result<(), Error>;
}
