use crate::{
    entity::EntityRef,
    repository::dto::{DeliveryWay, NotificationRecord, SendingRecord},
};
use bson::{oid::ObjectId, DateTime};
use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Deserialize)]
pub struct NotificationFindEntity {
    #[serde(rename = "_id")]
    pub id: ObjectId,
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
    #[serde(default)]
    pub sendings: Vec<SendingFindEntity>,
}

#[derive(Deserialize)]
pub struct SendingFindEntity {
    pub way: DeliveryWay,
    pub sent_to: String,
    pub sent_result: Option<String>,
    pub sent_at: DateTime,
}

fn entity_ref(kind: Option<String>, id: Option<String>) -> Option<EntityRef> {
    Some(EntityRef {
        kind: kind?,
        id: id?,
    })
}

impl From<NotificationFindEntity> for NotificationRecord {
    fn from(entity: NotificationFindEntity) -> Self {
        Self {
            id: entity.id,
            receiver: EntityRef {
                kind: entity.receiver_kind,
                id: entity.receiver_id,
            },
            sender: entity_ref(entity.sender_kind, entity.sender_id),
            notifiable: entity_ref(entity.notifiable_kind, entity.notifiable_id),
            linked: entity_ref(entity.linked_kind, entity.linked_id),
            code: entity.code,
            title: entity.title,
            body: entity.body,
            link: entity.link,
            official: entity.official,
            verbose: entity.verbose,
            created_at: OffsetDateTime::from(entity.created_at),
            read_at: entity.read_at.map(OffsetDateTime::from),
            sent_at: entity.sent_at.map(OffsetDateTime::from),
            sending_at: entity.sending_at.map(OffsetDateTime::from),
        }
    }
}

impl From<SendingFindEntity> for SendingRecord {
    fn from(entity: SendingFindEntity) -> Self {
        Self {
            way: entity.way,
            sent_to: entity.sent_to,
            sent_result: entity.sent_result,
            sent_at: OffsetDateTime::from(entity.sent_at),
        }
    }
}
