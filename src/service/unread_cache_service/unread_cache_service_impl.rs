use super::{CounterKey, CounterScope, CounterStore, UnreadCacheService};
use crate::{
    dto::output,
    entity::EntityRef,
    error::Error,
    repository::{NotificationRecord, NotificationsRepository},
};
use axum::async_trait;
use std::{collections::HashMap, sync::Arc};

pub struct UnreadCacheServiceConfig {
    /// Reconcile always overwrites; drift beyond this threshold is
    /// additionally reported as a cache inconsistency.
    pub drift_threshold: u64,
}

pub struct UnreadCacheServiceImpl {
    config: UnreadCacheServiceConfig,
    counter_store: Arc<dyn CounterStore>,
    repository: Arc<dyn NotificationsRepository>,
    known_kinds: Vec<String>,
}

impl UnreadCacheServiceImpl {
    pub fn new(
        config: UnreadCacheServiceConfig,
        counter_store: Arc<dyn CounterStore>,
        repository: Arc<dyn NotificationsRepository>,
        known_kinds: Vec<String>,
    ) -> Self {
        Self {
            config,
            counter_store,
            repository,
            known_kinds,
        }
    }

    fn keys(receiver: &EntityRef, notifiable_kind: Option<&str>, official: bool) -> Vec<CounterKey> {
        let mut keys = vec![CounterKey::new(receiver, CounterScope::All)];
        if let Some(kind) = notifiable_kind {
            keys.push(CounterKey::new(
                receiver,
                CounterScope::Kind(kind.to_string()),
            ));
        }
        if official {
            keys.push(CounterKey::new(receiver, CounterScope::Official));
        }

        keys
    }
}

#[async_trait]
impl UnreadCacheService for UnreadCacheServiceImpl {
    async fn increment_unread(&self, notification: &NotificationRecord) {
        let keys = Self::keys(
            &notification.receiver,
            notification.notifiable_kind(),
            notification.official,
        );
        for key in keys {
            self.counter_store.increment(&key).await;
        }
    }

    async fn decrement_unread(&self, notification: &NotificationRecord) {
        let keys = Self::keys(
            &notification.receiver,
            notification.notifiable_kind(),
            notification.official,
        );
        for key in keys {
            self.counter_store.decrement(&key).await;
        }
    }

    async fn unread_total(&self, receiver: &EntityRef) -> u64 {
        self.counter_store
            .read(&CounterKey::new(receiver, CounterScope::All))
            .await
    }

    async fn unread_count_details(&self, receiver: &EntityRef) -> output::UnreadCountDetails {
        let all = self.unread_total(receiver).await;

        let mut kinds = HashMap::new();
        for kind in &self.known_kinds {
            let count = self
                .counter_store
                .read(&CounterKey::new(
                    receiver,
                    CounterScope::Kind(kind.clone()),
                ))
                .await;
            kinds.insert(kind.clone(), count);
        }

        let official = self
            .counter_store
            .read(&CounterKey::new(receiver, CounterScope::Official))
            .await;

        output::UnreadCountDetails {
            all,
            kinds,
            official,
        }
    }

    async fn reconcile(&self, receiver: &EntityRef) -> Result<output::UnreadCountDetails, Error> {
        tracing::debug!(%receiver, "reconciling unread counters");

        let rollup = self.repository.count_unread(receiver).await?;

        let all_key = CounterKey::new(receiver, CounterScope::All);
        let cached_all = self.counter_store.read(&all_key).await;
        let drift = cached_all.abs_diff(rollup.total);
        if drift > self.config.drift_threshold {
            tracing::warn!(
                %receiver,
                cached = cached_all,
                recomputed = rollup.total,
                "unread cache inconsistency, overwriting with recomputed counters",
            );
        }

        self.counter_store.write(&all_key, rollup.total).await;

        for kind in &self.known_kinds {
            let count = rollup.by_kind.get(kind).copied().unwrap_or(0);
            self.counter_store
                .write(
                    &CounterKey::new(receiver, CounterScope::Kind(kind.clone())),
                    count,
                )
                .await;
        }
        // unregistered kinds that still have unread notifications
        for (kind, count) in &rollup.by_kind {
            if !self.known_kinds.contains(kind) {
                self.counter_store
                    .write(
                        &CounterKey::new(receiver, CounterScope::Kind(kind.clone())),
                        *count,
                    )
                    .await;
            }
        }

        self.counter_store
            .write(
                &CounterKey::new(receiver, CounterScope::Official),
                rollup.official,
            )
            .await;

        Ok(self.unread_count_details(receiver).await)
    }
}
