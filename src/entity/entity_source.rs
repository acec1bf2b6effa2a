use super::Error;
use axum::async_trait;
use serde_json::{Map, Value};
use time::UtcOffset;

/// Attribute snapshot of an entity at resolution time.
///
/// `title` and `body` expose the entity's own accessors when it has
/// them; they are the last resort of content resolution.
#[derive(Debug, Clone, Default)]
pub struct EntitySnapshot {
    pub attributes: Map<String, Value>,
    pub title: Option<String>,
    pub body: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntitySource: Send + Sync {
    ///
    /// Loads the entity snapshot used to render notification content.
    ///
    /// ### Returns
    /// None when the entity does not exist anymore
    ///
    async fn fetch(&self, id: &str) -> Result<Option<EntitySnapshot>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiverSource: Send + Sync {
    ///
    /// Tokens of the receiver's currently live realtime connections.
    /// Empty when the receiver is not connected anywhere.
    ///
    async fn live_tokens(&self, id: &str) -> Result<Vec<String>, Error>;

    ///
    /// Mobile push token, when the receiver has a registered device.
    ///
    async fn push_token(&self, id: &str) -> Result<Option<String>, Error>;

    ///
    /// UTC offset of the receiver, when it exposes one.
    ///
    async fn timezone(&self, id: &str) -> Result<Option<UtcOffset>, Error>;
}
