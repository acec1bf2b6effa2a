use crate::entity::EntityRef;
use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Notification with its content resolved for display.
#[derive(Debug, Serialize)]
pub struct Notification {
    pub id: String,
    pub receiver: EntityRef,
    pub sender: Option<EntityRef>,
    pub notifiable: Option<EntityRef>,
    pub code: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub link: String,
    /// Notifiable attribute snapshot; populated for verbose
    /// notifications only.
    pub attributes: Map<String, Value>,
    pub official: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub sent_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub sending_at: Option<OffsetDateTime>,
}
