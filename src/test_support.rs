//!
//! In process repository double shared by service tests, with the
//! same compare and set semantics as the mongo implementation.
//!

use crate::{
    entity::EntityRef,
    repository::{
        DeliveryWay, Error, NewNotification, NotificationRecord, NotificationsRepository,
        SendingRecord, UnreadRollup,
    },
};
use axum::async_trait;
use bson::oid::ObjectId;
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;

struct StoredNotification {
    record: NotificationRecord,
    sendings: Vec<SendingRecord>,
}

#[derive(Default)]
pub struct InMemoryNotificationsRepository {
    notifications: Mutex<Vec<StoredNotification>>,
}

impl InMemoryNotificationsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stored_unread_count(&self, receiver: &EntityRef) -> u64 {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|stored| stored.record.receiver == *receiver)
            .filter(|stored| stored.record.read_at.is_none())
            .count() as u64
    }
}

#[async_trait]
impl NotificationsRepository for InMemoryNotificationsRepository {
    async fn insert(
        &self,
        notification: NewNotification,
        created_at: OffsetDateTime,
    ) -> Result<NotificationRecord, Error> {
        let record = NotificationRecord {
            id: ObjectId::new(),
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
        };

        self.notifications.lock().await.push(StoredNotification {
            record: record.clone(),
            sendings: Vec::new(),
        });

        Ok(record)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<NotificationRecord>, Error> {
        let notifications = self.notifications.lock().await;
        let record = notifications
            .iter()
            .find(|stored| stored.record.id == id)
            .map(|stored| stored.record.clone());

        Ok(record)
    }

    async fn mark_read(&self, id: ObjectId, read_at: OffsetDateTime) -> Result<(), Error> {
        let mut notifications = self.notifications.lock().await;
        let stored = notifications
            .iter_mut()
            .find(|stored| stored.record.id == id && stored.record.read_at.is_none())
            .ok_or(Error::NoDocumentUpdated)?;

        stored.record.read_at = Some(read_at);

        Ok(())
    }

    async fn mark_unread(&self, id: ObjectId) -> Result<(), Error> {
        let mut notifications = self.notifications.lock().await;
        let stored = notifications
            .iter_mut()
            .find(|stored| stored.record.id == id && stored.record.read_at.is_some())
            .ok_or(Error::NoDocumentUpdated)?;

        stored.record.read_at = None;

        Ok(())
    }

    async fn set_sent_at(&self, id: ObjectId, sent_at: OffsetDateTime) -> Result<(), Error> {
        let mut notifications = self.notifications.lock().await;
        let stored = notifications
            .iter_mut()
            .find(|stored| stored.record.id == id && stored.record.sent_at.is_none())
            .ok_or(Error::NoDocumentUpdated)?;

        stored.record.sent_at = Some(sent_at);

        Ok(())
    }

    async fn insert_sending(
        &self,
        id: ObjectId,
        way: DeliveryWay,
        sent_to: &str,
        sent_result: Option<String>,
        sent_at: OffsetDateTime,
    ) -> Result<bool, Error> {
        let mut notifications = self.notifications.lock().await;
        let Some(stored) = notifications
            .iter_mut()
            .find(|stored| stored.record.id == id)
        else {
            return Ok(false);
        };

        let exists = stored
            .sendings
            .iter()
            .any(|sending| sending.way == way && sending.sent_to == sent_to);
        if exists {
            return Ok(false);
        }

        stored.sendings.push(SendingRecord {
            way,
            sent_to: sent_to.to_string(),
            sent_result,
            sent_at,
        });

        Ok(true)
    }

    async fn find_sendings(&self, id: ObjectId) -> Result<Vec<SendingRecord>, Error> {
        let notifications = self.notifications.lock().await;
        let sendings = notifications
            .iter()
            .find(|stored| stored.record.id == id)
            .map(|stored| stored.sendings.clone())
            .unwrap_or_default();

        Ok(sendings)
    }

    async fn find_many_unread(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let notifications = self.notifications.lock().await;
        let records = notifications
            .iter()
            .rev()
            .filter(|stored| stored.record.receiver == *receiver)
            .filter(|stored| stored.record.read_at.is_none())
            .map(|stored| stored.record.clone())
            .collect();

        Ok(records)
    }

    async fn find_many_read(
        &self,
        receiver: &EntityRef,
    ) -> Result<Vec<NotificationRecord>, Error> {
        let notifications = self.notifications.lock().await;
        let records = notifications
            .iter()
            .rev()
            .filter(|stored| stored.record.receiver == *receiver)
            .filter(|stored| stored.record.read_at.is_some())
            .map(|stored| stored.record.clone())
            .collect();

        Ok(records)
    }

    async fn count_unread(&self, receiver: &EntityRef) -> Result<UnreadRollup, Error> {
        let notifications = self.notifications.lock().await;
        let unread = notifications
            .iter()
            .filter(|stored| stored.record.receiver == *receiver)
            .filter(|stored| stored.record.read_at.is_none())
            .collect::<Vec<_>>();

        let mut by_kind: HashMap<String, u64> = HashMap::new();
        for stored in &unread {
            if let Some(kind) = stored.record.notifiable_kind() {
                *by_kind.entry(kind.to_string()).or_insert(0) += 1;
            }
        }

        Ok(UnreadRollup {
            total: unread.len() as u64,
            by_kind,
            official: unread
                .iter()
                .filter(|stored| stored.record.official)
                .count() as u64,
        })
    }
}
