use crate::repository::SettingRecord;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NotificationSetting {
    pub showtime: bool,
    pub accept_email: Option<bool>,
}

impl From<SettingRecord> for NotificationSetting {
    fn from(setting: SettingRecord) -> Self {
        Self {
            showtime: setting.showtime,
            accept_email: setting.accept_email,
        }
    }
}
