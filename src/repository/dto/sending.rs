use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Delivery mechanism a channel sends through.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeliveryWay {
    Email,
    Websocket,
    Push,
}

/// One delivery attempt of a notification to one destination.
/// At most one record exists per (notification, way, destination).
#[derive(Debug, Clone)]
pub struct SendingRecord {
    pub way: DeliveryWay,
    pub sent_to: String,
    pub sent_result: Option<String>,
    pub sent_at: OffsetDateTime,
}
