use serde::Serialize;
use std::collections::HashMap;

/// Cached unread counters of one receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadCountDetails {
    pub all: u64,
    /// One entry per known notifiable kind; absent counters read as 0.
    pub kinds: HashMap<String, u64>,
    pub official: u64,
}
