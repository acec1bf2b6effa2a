use crate::{dto::input, entity::EntityRef};
use bson::oid::ObjectId;
use time::OffsetDateTime;

/// Stored notification, the aggregate root of the engine.
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub id: ObjectId,
    pub receiver: EntityRef,
    pub sender: Option<EntityRef>,
    pub notifiable: Option<EntityRef>,
    pub linked: Option<EntityRef>,
    pub code: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub link: Option<String>,
    pub official: bool,
    pub verbose: bool,
    pub created_at: OffsetDateTime,
    pub read_at: Option<OffsetDateTime>,
    pub sent_at: Option<OffsetDateTime>,
    pub sending_at: Option<OffsetDateTime>,
}

impl NotificationRecord {
    pub fn notifiable_kind(&self) -> Option<&str> {
        self.notifiable.as_ref().map(|notifiable| notifiable.kind.as_str())
    }
}

/// Notification to insert; created unread with `sent_at` unset.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub receiver: EntityRef,
    pub sender: Option<EntityRef>,
    pub notifiable: Option<EntityRef>,
    pub linked: Option<EntityRef>,
    pub code: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub link: Option<String>,
    pub official: bool,
    pub verbose: bool,
    pub sending_at: Option<OffsetDateTime>,
}

impl From<input::Notification> for NewNotification {
    fn from(notification: input::Notification) -> Self {
        Self {
            receiver: notification.receiver,
            sender: notification.sender,
            notifiable: notification.notifiable,
            linked: notification.linked,
            code: notification.code,
            title: notification.title,
            body: notification.body,
            link: notification.link,
            official: notification.official,
            verbose: notification.verbose,
            sending_at: notification.sending_at,
        }
    }
}
