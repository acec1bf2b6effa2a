use serde_json::{Map, Value};
use std::collections::HashMap;

/// Localization store primitive: key existence and key resolution
/// with interpolation variables.
#[cfg_attr(test, mockall::automock)]
pub trait Translations: Send + Sync {
    fn exists(&self, key: &str) -> bool;

    /// Resolves the key, interpolating the variables it references.
    /// Variables the template does not mention are ignored.
    fn resolve(&self, key: &str, vars: &Map<String, Value>) -> String;
}

/// In memory translation table with `%{var}` interpolation.
#[derive(Default)]
pub struct StaticTranslations {
    entries: HashMap<String, String>,
}

impl StaticTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }
}

impl Translations for StaticTranslations {
    fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn resolve(&self, key: &str, vars: &Map<String, Value>) -> String {
        let Some(template) = self.entries.get(key) else {
            return String::new();
        };

        let mut resolved = template.clone();
        for (name, value) in vars {
            let placeholder = format!("%{{{name}}}");
            if !resolved.contains(&placeholder) {
                continue;
            }

            let replacement = match value {
                Value::String(text) => text.clone(),
                value => value.to_string(),
            };
            resolved = resolved.replace(&placeholder, &replacement);
        }

        resolved
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_interpolates_referenced_vars() {
        let mut translations = StaticTranslations::new();
        translations.insert("notify.order.shipped.title", "Order %{number} shipped");

        let mut vars = Map::new();
        vars.insert("number".to_string(), json!("A-1"));
        vars.insert("unused".to_string(), json!("ignored"));

        let resolved = translations.resolve("notify.order.shipped.title", &vars);

        assert_eq!(resolved, "Order A-1 shipped");
    }

    #[test]
    fn resolve_renders_non_string_vars() {
        let mut translations = StaticTranslations::new();
        translations.insert("notify.order.shipped.body", "%{count} items");

        let mut vars = Map::new();
        vars.insert("count".to_string(), json!(3));

        let resolved = translations.resolve("notify.order.shipped.body", &vars);

        assert_eq!(resolved, "3 items");
    }

    #[test]
    fn resolve_unknown_key_is_empty() {
        let translations = StaticTranslations::new();

        let resolved = translations.resolve("notify.order.shipped.title", &Map::new());

        assert!(resolved.is_empty());
    }

    #[test]
    fn exists_reflects_table() {
        let mut translations = StaticTranslations::new();
        translations.insert("notify.order.shipped.title", "t");

        assert!(translations.exists("notify.order.shipped.title"));
        assert!(!translations.exists("notify.order.shipped.body"));
    }
}
