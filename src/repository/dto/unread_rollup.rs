use std::collections::HashMap;

/// Unread counts recomputed from stored notifications, the source of
/// truth the cache reconciles against.
#[derive(Debug, Clone, Default)]
pub struct UnreadRollup {
    pub total: u64,
    pub by_kind: HashMap<String, u64>,
    pub official: u64,
}
