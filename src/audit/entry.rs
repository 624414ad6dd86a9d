use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rules::NotificationRule;

/// Longest test-mode preview stored, in characters
pub const MAX_PREVIEW_CHARS: usize = 64_000;

/// Appended to previews cut at `MAX_PREVIEW_CHARS`
pub const TRUNCATION_SUFFIX: &str = " ...";

/// A row in the bot log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub rule_id: u64,
    pub rule_title: String,
    /// Number of objects the rule fired for
    pub count: u32,
    pub test_mode: bool,
    pub additional_data: String,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Regular entry carrying a rendered description of the affected users
    pub fn affected(rule: &NotificationRule, description: String) -> Self {
        Self::new(rule, false, description)
    }

    /// Test-mode entry; the preview is truncated and wrapped in the
    /// three-field payload log viewers expect.
    pub fn test_preview(rule: &NotificationRule, preview: &str) -> Self {
        let payload = TestModePayload::new(truncate_preview(preview));
        Self::new(rule, true, payload.encode())
    }

    fn new(rule: &NotificationRule, test_mode: bool, additional_data: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            rule_id: rule.id,
            rule_title: rule.title.clone(),
            count: 1,
            test_mode,
            additional_data,
            created_at: Utc::now(),
        }
    }
}

/// `["", "", preview]`; the first two fields are reserved and stay empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestModePayload(pub String, pub String, pub String);

impl TestModePayload {
    pub fn new(preview: String) -> Self {
        Self(String::new(), String::new(), preview)
    }

    pub fn preview(&self) -> &str {
        &self.2
    }

    pub fn encode(&self) -> String {
        // A tuple of strings always serializes
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Cut `text` to `MAX_PREVIEW_CHARS` characters, marking the cut.
pub fn truncate_preview(text: &str) -> String {
    match text.char_indices().nth(MAX_PREVIEW_CHARS) {
        Some((byte_idx, _)) => {
            let mut cut = String::with_capacity(byte_idx + TRUNCATION_SUFFIX.len());
            cut.push_str(&text[..byte_idx]);
            cut.push_str(TRUNCATION_SUFFIX);
            cut
        }
        None => text.to_string(),
    }
}
