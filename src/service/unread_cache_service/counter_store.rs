use crate::entity::EntityRef;
use axum::async_trait;
use std::{collections::HashMap, fmt};
use tokio::sync::Mutex;

/// Scope of one unread counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CounterScope {
    All,
    Kind(String),
    Official,
}

impl fmt::Display for CounterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterScope::All => write!(f, "all"),
            CounterScope::Kind(kind) => write!(f, "{kind}"),
            CounterScope::Official => write!(f, "official"),
        }
    }
}

/// Composite key of one unread counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub receiver_kind: String,
    pub receiver_id: String,
    pub scope: CounterScope,
}

impl CounterKey {
    pub fn new(receiver: &EntityRef, scope: CounterScope) -> Self {
        Self {
            receiver_kind: receiver.kind.clone(),
            receiver_id: receiver.id.clone(),
            scope,
        }
    }
}

/// Counter storage with atomic operations. Writes are best effort,
/// a networked backend absorbs its own failures; counters are
/// recovered through reconciliation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn increment(&self, key: &CounterKey);

    /// Decrements the counter, clamping at zero.
    async fn decrement(&self, key: &CounterKey);

    /// Missing counters read as zero.
    async fn read(&self, key: &CounterKey) -> u64;

    async fn write(&self, key: &CounterKey, value: u64);
}

/// Process local counter store; lives from startup to shutdown.
#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<CounterKey, u64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &CounterKey) {
        let mut counters = self.counters.lock().await;
        *counters.entry(key.clone()).or_insert(0) += 1;
    }

    async fn decrement(&self, key: &CounterKey) {
        let mut counters = self.counters.lock().await;
        if let Some(value) = counters.get_mut(key) {
            *value = value.saturating_sub(1);
        }
    }

    async fn read(&self, key: &CounterKey) -> u64 {
        self.counters.lock().await.get(key).copied().unwrap_or(0)
    }

    async fn write(&self, key: &CounterKey, value: u64) {
        self.counters.lock().await.insert(key.clone(), value);
    }
}
