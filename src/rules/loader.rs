//! Load rule definitions from a JSON file

use std::path::Path;

use thiserror::Error;

use super::types::NotificationRule;

#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rule file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of rules
pub fn load_rules_file(path: impl AsRef<Path>) -> Result<Vec<NotificationRule>, RuleLoadError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let raw = std::fs::read_to_string(path).map_err(|source| RuleLoadError::Io {
        path: path_str.clone(),
        source,
    })?;

    let rules: Vec<NotificationRule> =
        serde_json::from_str(&raw).map_err(|source| RuleLoadError::Parse {
            path: path_str.clone(),
            source,
        })?;

    tracing::debug!(path = %path_str, count = rules.len(), "Loaded rule file");
    Ok(rules)
}
