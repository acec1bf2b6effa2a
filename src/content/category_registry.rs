use crate::entity::EntitySnapshot;
use serde_json::{Map, Value};
use std::{collections::HashMap, sync::Arc};

/// Category assigned to notifications created without an explicit code.
pub const DEFAULT_CODE: &str = "default";

/// Producer of cc addresses: a literal or a function of the
/// notifiable snapshot. Derived producers may return many addresses,
/// the resolved list is flattened.
#[derive(Clone)]
pub enum CcEmail {
    Literal(String),
    Derived(Arc<dyn Fn(&EntitySnapshot) -> Vec<String> + Send + Sync>),
}

/// Mailer invoked by the email channel for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailerSelector {
    pub mailer: String,
    pub method: String,
}

impl MailerSelector {
    pub fn new(mailer: impl Into<String>) -> Self {
        Self {
            mailer: mailer.into(),
            method: "notify".to_string(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }
}

impl Default for MailerSelector {
    fn default() -> Self {
        Self::new("notice")
    }
}

/// Field projection applied to the notifiable snapshot before it is
/// used as translation variables or a verbose attribute dump.
#[derive(Debug, Clone, Default)]
pub struct AttributeProjection {
    pub only: Option<Vec<String>>,
    pub except: Vec<String>,
}

impl AttributeProjection {
    pub fn apply(&self, attributes: &Map<String, Value>) -> Map<String, Value> {
        attributes
            .iter()
            .filter(|(key, _)| match &self.only {
                Some(only) => only.iter().any(|k| k == *key),
                None => true,
            })
            .filter(|(key, _)| !self.except.iter().any(|k| k == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Per (notifiable kind, code) delivery configuration.
#[derive(Clone, Default)]
pub struct CategoryConfig {
    pub mailer: Option<MailerSelector>,
    pub cc_emails: Vec<CcEmail>,
    pub projection: AttributeProjection,
    /// Literal translation variables, they win over projected attributes.
    pub tr_values: Map<String, Value>,
}

/// Startup populated `(notifiable kind, code) -> CategoryConfig` map.
/// Unregistered kinds resolve to the default configuration.
#[derive(Default)]
pub struct CategoryRegistry {
    configs: HashMap<String, HashMap<String, CategoryConfig>>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: impl Into<String>,
        code: impl Into<String>,
        config: CategoryConfig,
    ) {
        self.configs
            .entry(kind.into())
            .or_default()
            .insert(code.into(), config);
    }

    pub fn config(&self, kind: &str, code: &str) -> Option<&CategoryConfig> {
        self.configs.get(kind)?.get(code)
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.configs.contains_key(kind)
    }

    pub fn has_code(&self, kind: &str, code: &str) -> bool {
        self.configs
            .get(kind)
            .map(|codes| codes.contains_key(code))
            .unwrap_or(false)
    }
}
