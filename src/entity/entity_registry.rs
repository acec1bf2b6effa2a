use super::{EntitySource, ReceiverSource};
use std::{collections::HashMap, sync::Arc};

/// Startup populated map of the entity kinds the host application
/// exposes to the engine. Kinds missing from the registry are legal,
/// they resolve to empty capability sets.
#[derive(Default)]
pub struct EntityRegistry {
    notifiables: HashMap<String, Arc<dyn EntitySource>>,
    receivers: HashMap<String, Arc<dyn ReceiverSource>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_notifiable(&mut self, kind: impl Into<String>, source: Arc<dyn EntitySource>) {
        self.notifiables.insert(kind.into(), source);
    }

    pub fn register_receiver(&mut self, kind: impl Into<String>, source: Arc<dyn ReceiverSource>) {
        self.receivers.insert(kind.into(), source);
    }

    pub fn notifiable(&self, kind: &str) -> Option<&Arc<dyn EntitySource>> {
        self.notifiables.get(kind)
    }

    pub fn receiver(&self, kind: &str) -> Option<&Arc<dyn ReceiverSource>> {
        self.receivers.get(kind)
    }

    /// Kinds enumerated by unread count details.
    pub fn notifiable_kinds(&self) -> impl Iterator<Item = &str> {
        self.notifiables.keys().map(String::as_str)
    }
}
