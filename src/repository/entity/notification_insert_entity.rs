use bson::DateTime;
use serde::Serialize;

#[derive(Serialize)]
pub struct NotificationInsertEntity {
    pub receiver_kind: String,
    pub receiver_id: String,
    pub sender_kind: Option<String>,
    pub sender_id: Option<String>,
    pub notifiable_kind: Option<String>,
    pub notifiable_id: Option<String>,
    pub linked_kind: Option<String>,
    pub linked_id: Option<String>,
    pub code: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub link: Option<String>,
    pub official: bool,
    pub verbose: bool,
    pub created_at: DateTime,
    pub read_at: Option<DateTime>,
    pub sent_at: Option<DateTime>,
    pub sending_at: Option<DateTime>,
    pub sendings: [(); 0],
}
