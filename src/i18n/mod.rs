//! Language item rendering for log descriptions.
//!
//! The pipeline renders log texts in the configured default language through
//! the `Localizer` trait. `CatalogLocalizer` is a flat key/template catalogue
//! using `{{name}}` placeholders.

mod substitution;

use dashmap::DashMap;

pub use substitution::substitute_string;

/// Description of users affected by a non-test rule run.
/// Variables: `total`, `userIDs`.
pub const LOG_USER_AFFECTED: &str = "bot.log.user.affected";

/// Test-mode preview. Variables: `objects`, `users`, `userIDs`.
pub const LOG_TEST: &str = "bot.log.test";

/// Renders a language item with parameters
pub trait Localizer: Send + Sync {
    fn language(&self) -> &str;

    /// Render `key`; unknown keys render as the key itself.
    fn render(&self, key: &str, variables: &serde_json::Value) -> String;
}

/// In-memory catalogue for a single language
pub struct CatalogLocalizer {
    language: String,
    items: DashMap<String, String>,
}

impl CatalogLocalizer {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            items: DashMap::new(),
        }
    }

    /// Catalogue seeded with the bot log items
    pub fn with_defaults(language: impl Into<String>) -> Self {
        let localizer = Self::new(language);
        localizer.insert(
            LOG_USER_AFFECTED,
            "{{total}} object(s) processed, affected user IDs: {{userIDs}}",
        );
        localizer.insert(
            LOG_TEST,
            "Test mode: {{objects}} object(s), {{users}} affected user(s). User IDs: {{userIDs}}",
        );
        localizer
    }

    pub fn insert(&self, key: impl Into<String>, template: impl Into<String>) {
        self.items.insert(key.into(), template.into());
    }
}

impl Localizer for CatalogLocalizer {
    fn language(&self) -> &str {
        &self.language
    }

    fn render(&self, key: &str, variables: &serde_json::Value) -> String {
        match self.items.get(key) {
            Some(template) => substitute_string(template.value(), variables),
            None => {
                tracing::warn!(key = %key, language = %self.language, "Missing language item");
                key.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_items() {
        let localizer = CatalogLocalizer::with_defaults("en");
        assert_eq!(localizer.language(), "en");

        let text = localizer.render(LOG_USER_AFFECTED, &json!({ "total": 1, "userIDs": "4, 5" }));
        assert_eq!(text, "1 object(s) processed, affected user IDs: 4, 5");

        let preview = localizer.render(
            LOG_TEST,
            &json!({ "objects": 1, "users": 2, "userIDs": "4, 5" }),
        );
        assert_eq!(
            preview,
            "Test mode: 1 object(s), 2 affected user(s). User IDs: 4, 5"
        );
    }

    #[test]
    fn test_unknown_key_renders_key() {
        let localizer = CatalogLocalizer::new("de");
        assert_eq!(localizer.render("bot.missing", &json!({})), "bot.missing");
    }

    #[test]
    fn test_override_item() {
        let localizer = CatalogLocalizer::with_defaults("de");
        localizer.insert(LOG_USER_AFFECTED, "Betroffene Benutzer: {{userIDs}}");
        assert_eq!(
            localizer.render(LOG_USER_AFFECTED, &json!({ "userIDs": "1" })),
            "Betroffene Benutzer: 1"
        );
    }
}
