use super::{
    dto::{NewNotification, NotificationRecord, SendingRecord, UnreadRollup},
    entity::{NotificationFindEntity, NotificationInsertEntity},
    DeliveryWay, Error, NotificationsRepository,
};
use crate::entity::EntityRef;
use axum::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{error::ErrorKind, options::IndexOptions, Collection, Database, IndexModel};
use std::{collections::HashMap, sync::Arc};
use time::OffsetDateTime;

const NOTIFICATIONS: &str = "notifications";
const INDEX_NAME_RECEIVER_READ_AT: &str = "index_receiver_read_at";

pub struct NotificationsRepositoryImpl {
    database: Database,
}

impl NotificationsRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        database.create_collection(NOTIFICATIONS).await?;

        let collection = database.collection::<Document>(NOTIFICATIONS);
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_RECEIVER_READ_AT.to_string()) {
            Self::create_receiver_read_at_index(&collection).await?;
            tracing::debug!("created index {NOTIFICATIONS}.{INDEX_NAME_RECEIVER_READ_AT}");
        }

        Ok(Self { database })
    }

    async fn create_receiver_read_at_index(
        collection: &Collection<Document>,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! {
                "receiver_kind": 1,
                "receiver_id": 1,
                "read_at": 1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME_RECEIVER_READ_AT.to_string())
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }

    fn receiver_filter(receiver: &EntityRef) -> Document {
        doc! {
            "receiver_kind": &receiver.kind,
            "receiver_id": &receiver.id,
        }
    }
}

#[async_trait]
impl NotificationsRepository for NotificationsRepositoryImpl {
    async fn insert(
        &self,
        notification: NewNotification,
        created_at: OffsetDateTime,
    ) -> Result<NotificationRecord, Error> {
        let insert_entity = NotificationInsertEntity {
            receiver_kind: notification.receiver.kind.clone(),
            receiver_id: notification.receiver.id.clone(),
            sender_kind: notification.sender.as_ref().map(|s| s.kind.clone()),
            sender_id: notification.sender.as_ref().map(|s| s.id.clone()),
            notifiable_kind: notification.notifiable.as_ref().map(|n| n.kind.clone()),
            notifiable_id: notification.notifiable.as_ref().map(|n| n.id.clone()),
            linked_kind: notification.linked.as_ref().map(|l| l.kind.clone()),
            linked_id: notification.linked.as_ref().map(|l| l.id.clone()),
            code: notification.code.clone(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            link: notification.link.clone(),
            official: notification.official,
            verbose: notification.verbose,
            created_at: DateTime::from(created_at),
            read_at: None,
            sent_at: None,
            sending_at: notification.sending_at.map(DateTime::from),
            sendings: [],
        };

        let insert_result = self
            .database
            .collection::<NotificationInsertEntity>(NOTIFICATIONS)
            .insert_one(&insert_entity)
            .await?;

        let Bson::ObjectId(id) = insert_result.inserted_id else {
            tracing::error!("invalid type of inserted '_id'");
            return Err(Error::Mongo(
                ErrorKind::Custom(Arc::new("invalid type of inserted '_id'")).into(),
            ));
        };

        Ok(NotificationRecord {
            id,
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
            created_at,
            read_at: None,
            sent_at: None,
            sending_at: notification.sending_at,
        })
    }

    async fn find(&self, id: ObjectId) -> Result<Option<NotificationRecord>, Error> {
        let entity = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find_one(doc! { "_id": id })
            .await?;

        Ok(entity.map(NotificationRecord::from))
    }

    async fn mark_read(&self, id: ObjectId, read_at: OffsetDateTime) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_one(
                doc! {
                    "_id": id,
                    "read_at": None as Option<DateTime>,
                },
                doc! {
                    "$set": {
                        "read_at": DateTime::from(read_at),
                    }
                },
            )
            .await?;

        match update_result.modified_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn mark_unread(&self, id: ObjectId) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_one(
                doc! {
                    "_id": id,
                    "read_at": { "$ne": None as Option<DateTime> },
                },
                doc! {
                    "$set": {
                        "read_at": None as Option<DateTime>,
                    }
                },
            )
            .await?;

        match update_result.modified_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn set_sent_at(&self, id: ObjectId, sent_at: OffsetDateTime) -> Result<(), Error> {
        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_one(
                doc! {
                    "_id": id,
                    "sent_at": None as Option<DateTime>,
                },
                doc! {
                    "$set": {
                        "sent_at": DateTime::from(sent_at),
                    }
                },
            )
            .await?;

        match update_result.modified_count == 1 {
            true => Ok(()),
            false => Err(Error::NoDocumentUpdated),
        }
    }

    async fn insert_sending(
        &self,
        id: ObjectId,
        way: DeliveryWay,
        sent_to: &str,
        sent_result: Option<String>,
        sent_at: OffsetDateTime,
    ) -> Result<bool, Error> {
        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_one(
                doc! {
                    "_id": id,
                    "sendings": {
                        "$not": {
                            "$elemMatch": {
                                "way": way.to_string(),
                                "sent_to": sent_to,
                            }
                        }
                    }
                },
                doc! {
                    "$push": {
                        "sendings": {
                            "way": way.to_string(),
                            "sent_to": sent_to,
                            "sent_result": sent_result,
                            "sent_at": DateTime::from(sent_at),
                        }
                    }
                },
            )
            .await?;

        Ok(update_result.modified_count == 1)
    }

    async fn find_sendings(&self, id: ObjectId) -> Result<Vec<SendingRecord>, Error> {
        let entity = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find_one(doc! { "_id": id })
            .await?;

        let sendings = entity
            .map(|entity| entity.sendings.into_iter().map(SendingRecord::from).collect())
            .unwrap_or_default();

        Ok(sendings)
    }

    async fn find_many_unread(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let mut filter = Self::receiver_filter(receiver);
        filter.insert("read_at", None as Option<DateTime>);

        let mut cursor = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find(filter)
            .sort(doc! { "_id": -1 })
            .await?;

        let mut notifications = Vec::new();
        while let Some(entity) = cursor.try_next().await? {
            notifications.push(entity.into());
        }

        Ok(notifications)
    }

    async fn find_many_read(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let mut filter = Self::receiver_filter(receiver);
        filter.insert("read_at", doc! { "$ne": None as Option<DateTime> });

        let mut cursor = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find(filter)
            .sort(doc! { "_id": -1 })
            .await?;

        let mut notifications = Vec::new();
        while let Some(entity) = cursor.try_next().await? {
            notifications.push(entity.into());
        }

        Ok(notifications)
    }

    async fn count_unread(&self, receiver: &EntityRef) -> Result<UnreadRollup, Error> {
        let mut unread_filter = Self::receiver_filter(receiver);
        unread_filter.insert("read_at", None as Option<DateTime>);

        let collection = self.database.collection::<Document>(NOTIFICATIONS);

        let total = collection.count_documents(unread_filter.clone()).await?;

        let mut official_filter = unread_filter.clone();
        official_filter.insert("official", true);
        let official = collection.count_documents(official_filter).await?;

        let pipeline = vec![
            doc! { "$match": unread_filter },
            doc! {
                "$group": {
                    "_id": "$notifiable_kind",
                    "count": { "$sum": 1 },
                }
            },
        ];

        let mut by_kind = HashMap::new();
        let mut cursor = collection.aggregate(pipeline).await?;
        while let Some(group) = cursor.try_next().await? {
            let Ok(kind) = group.get_str("_id") else {
                // notifications without a notifiable entity
                continue;
            };
            let count = match group.get("count") {
                Some(Bson::Int32(count)) => *count as u64,
                Some(Bson::Int64(count)) => *count as u64,
                _ => continue,
            };
            by_kind.insert(kind.to_string(), count);
        }

        Ok(UnreadRollup {
            total,
            by_kind,
            official,
        })
    }
}
