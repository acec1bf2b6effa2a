use crate::repository::dto::SettingRecord;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SettingFindEntity {
    pub showtime: bool,
    pub accept_email: Option<bool>,
}

impl From<SettingFindEntity> for SettingRecord {
    fn from(entity: SettingFindEntity) -> Self {
        Self {
            showtime: entity.showtime,
            accept_email: entity.accept_email,
        }
    }
}
