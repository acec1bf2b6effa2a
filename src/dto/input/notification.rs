use crate::{content::DEFAULT_CODE, entity::EntityRef};
use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct Notification {
    pub receiver: EntityRef,
    pub sender: Option<EntityRef>,
    pub notifiable: Option<EntityRef>,
    pub linked: Option<EntityRef>,
    #[serde(default = "default_code")]
    pub code: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub verbose: bool,
    /// Defers dispatch until the given time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub sending_at: Option<OffsetDateTime>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub link: Option<String>,
}

fn default_code() -> String {
    DEFAULT_CODE.to_string()
}
