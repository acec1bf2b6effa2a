use super::{dto::SettingRecord, entity::SettingFindEntity, Error, SettingsRepository};
use crate::entity::EntityRef;
use axum::async_trait;
use bson::{doc, Document};
use mongodb::{options::IndexOptions, Collection, Database, IndexModel};

const NOTIFICATION_SETTINGS: &str = "notification_settings";
const INDEX_NAME_UNIQUE_RECEIVER: &str = "unique_index_receiver";

pub struct SettingsRepositoryImpl {
    database: Database,
}

impl SettingsRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        database.create_collection(NOTIFICATION_SETTINGS).await?;

        let collection = database.collection::<Document>(NOTIFICATION_SETTINGS);
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_UNIQUE_RECEIVER.to_string()) {
            Self::create_unique_receiver_index(&collection).await?;
            tracing::debug!("created index {NOTIFICATION_SETTINGS}.{INDEX_NAME_UNIQUE_RECEIVER}");
        }

        Ok(Self { database })
    }

    async fn create_unique_receiver_index(
        collection: &Collection<Document>,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! {
                "receiver_kind": 1,
                "receiver_id": 1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME_UNIQUE_RECEIVER.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for SettingsRepositoryImpl {
    async fn find(&self, receiver: &EntityRef) -> Result<Option<SettingRecord>, Error> {
        let entity = self
            .database
            .collection::<SettingFindEntity>(NOTIFICATION_SETTINGS)
            .find_one(doc! {
                "receiver_kind": &receiver.kind,
                "receiver_id": &receiver.id,
            })
            .await?;

        Ok(entity.map(SettingRecord::from))
    }

    async fn upsert(&self, receiver: &EntityRef, setting: SettingRecord) -> Result<(), Error> {
        self.database
            .collection::<Document>(NOTIFICATION_SETTINGS)
            .update_one(
                doc! {
                    "receiver_kind": &receiver.kind,
                    "receiver_id": &receiver.id,
                },
                doc! {
                    "$set": {
                        "showtime": setting.showtime,
                        "accept_email": setting.accept_email,
                    }
                },
            )
            .upsert(true)
            .await?;

        Ok(())
    }
}
