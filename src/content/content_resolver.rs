use super::{CategoryConfig, CategoryRegistry, CcEmail, MailerSelector, Translations};
use crate::{
    entity::{self, EntityRegistry, EntitySnapshot},
    repository::NotificationRecord,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, UtcOffset,
};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub struct ContentResolverConfig {
    pub link_host: String,
}

/// Content resolved for one notification: the rendered fields plus
/// the category delivery configuration consulted by channels.
#[derive(Debug, Clone, Default)]
pub struct ResolvedContent {
    pub title: Option<String>,
    pub body: Option<String>,
    pub link: String,
    /// Projected notifiable snapshot; empty unless the notification
    /// is verbose.
    pub attributes: Map<String, Value>,
    pub cc_emails: Vec<String>,
    pub mailer: Option<MailerSelector>,
}

#[derive(Clone, Copy)]
enum ContentField {
    Title,
    Body,
}

impl ContentField {
    fn as_str(self) -> &'static str {
        match self {
            ContentField::Title => "title",
            ContentField::Body => "body",
        }
    }
}

pub struct ContentResolver {
    config: ContentResolverConfig,
    categories: Arc<CategoryRegistry>,
    entities: Arc<EntityRegistry>,
    translations: Arc<dyn Translations>,
}

impl ContentResolver {
    pub fn new(
        config: ContentResolverConfig,
        categories: Arc<CategoryRegistry>,
        entities: Arc<EntityRegistry>,
        translations: Arc<dyn Translations>,
    ) -> Self {
        Self {
            config,
            categories,
            entities,
            translations,
        }
    }

    ///
    /// Resolves title, body, link, the verbose attribute snapshot and
    /// the category delivery configuration of the notification.
    ///
    /// Stored overrides win; otherwise fields come from the
    /// translation store, falling back to the notifiable's own
    /// accessors. Missing pieces resolve to empty values, never to
    /// an error.
    ///
    pub async fn resolve(
        &self,
        notification: &NotificationRecord,
    ) -> Result<ResolvedContent, entity::Error> {
        let snapshot = self.fetch_notifiable_snapshot(notification).await?;
        let config = self.category_config(notification);

        let title = self.resolve_field(notification, &snapshot, &config, ContentField::Title);
        let body = self.resolve_field(notification, &snapshot, &config, ContentField::Body);
        let link = self.resolve_link(notification);
        let attributes = self
            .resolve_attributes(notification, &snapshot, &config)
            .await?;
        let cc_emails = Self::resolve_cc_emails(&config, &snapshot);

        Ok(ResolvedContent {
            title,
            body,
            link,
            attributes,
            cc_emails,
            mailer: config.mailer,
        })
    }

    async fn fetch_notifiable_snapshot(
        &self,
        notification: &NotificationRecord,
    ) -> Result<Option<EntitySnapshot>, entity::Error> {
        let Some(notifiable) = &notification.notifiable else {
            return Ok(None);
        };
        let Some(source) = self.entities.notifiable(&notifiable.kind) else {
            return Ok(None);
        };

        source.fetch(&notifiable.id).await
    }

    fn category_config(&self, notification: &NotificationRecord) -> CategoryConfig {
        notification
            .notifiable
            .as_ref()
            .and_then(|notifiable| self.categories.config(&notifiable.kind, &notification.code))
            .cloned()
            .unwrap_or_default()
    }

    fn translation_key(kind: &str, code: &str, field: ContentField) -> String {
        format!("notify.{kind}.{code}.{}", field.as_str())
    }

    fn resolve_field(
        &self,
        notification: &NotificationRecord,
        snapshot: &Option<EntitySnapshot>,
        config: &CategoryConfig,
        field: ContentField,
    ) -> Option<String> {
        let stored = match field {
            ContentField::Title => &notification.title,
            ContentField::Body => &notification.body,
        };
        if let Some(stored) = stored {
            if !stored.is_empty() {
                return Some(stored.clone());
            }
        }

        if let Some(kind) = notification.notifiable_kind() {
            let key = Self::translation_key(kind, &notification.code, field);
            if self.translations.exists(&key) {
                let mut vars = match snapshot {
                    Some(snapshot) => config.projection.apply(&snapshot.attributes),
                    None => Map::new(),
                };
                for (name, value) in &config.tr_values {
                    vars.insert(name.clone(), value.clone());
                }

                return Some(self.translations.resolve(&key, &vars));
            }
        }

        snapshot.as_ref().and_then(|snapshot| match field {
            ContentField::Title => snapshot.title.clone(),
            ContentField::Body => snapshot.body.clone(),
        })
    }

    fn resolve_link(&self, notification: &NotificationRecord) -> String {
        if let Some(link) = &notification.link {
            if !link.is_empty() {
                return link.clone();
            }
        }

        match &notification.linked {
            Some(linked) => format!("{}/{}/{}", self.config.link_host, linked.kind, linked.id),
            None => format!(
                "{}/notifications/{}",
                self.config.link_host,
                notification.id.to_hex()
            ),
        }
    }

    async fn resolve_attributes(
        &self,
        notification: &NotificationRecord,
        snapshot: &Option<EntitySnapshot>,
        config: &CategoryConfig,
    ) -> Result<Map<String, Value>, entity::Error> {
        if !notification.verbose {
            return Ok(Map::new());
        }
        let Some(snapshot) = snapshot else {
            return Ok(Map::new());
        };

        let offset = match self.entities.receiver(&notification.receiver.kind) {
            Some(source) => source
                .timezone(&notification.receiver.id)
                .await?
                .unwrap_or(UtcOffset::UTC),
            None => UtcOffset::UTC,
        };

        let attributes = config
            .projection
            .apply(&snapshot.attributes)
            .into_iter()
            .map(|(key, value)| (key, Self::render_timestamp(value, offset)))
            .collect();

        Ok(attributes)
    }

    fn render_timestamp(value: Value, offset: UtcOffset) -> Value {
        let Value::String(text) = &value else {
            return value;
        };
        let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) else {
            return value;
        };

        match timestamp.to_offset(offset).format(TIMESTAMP_FORMAT) {
            Ok(rendered) => Value::String(rendered),
            Err(_) => value,
        }
    }

    fn resolve_cc_emails(config: &CategoryConfig, snapshot: &Option<EntitySnapshot>) -> Vec<String> {
        config
            .cc_emails
            .iter()
            .flat_map(|cc| match cc {
                CcEmail::Literal(address) => vec![address.clone()],
                CcEmail::Derived(producer) => match snapshot {
                    Some(snapshot) => producer(snapshot),
                    None => Vec::new(),
                },
            })
            .collect()
    }
}
