//! Notification rule definitions

use serde::{Deserialize, Serialize};

use crate::dispatch::EventKind;

/// How a rule delivers its notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyKind {
    Conversation,
    Email,
    Article,
    Comment,
}

/// Result of a positive eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyPlan {
    pub kind: NotifyKind,
}

/// Notification part of a rule, decides whether a notification is due
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySettings {
    /// `None` means the rule only logs
    #[serde(default)]
    pub kind: Option<NotifyKind>,
    /// Notify when the triggering object was just created
    #[serde(default = "default_true")]
    pub on_create: bool,
    /// Allow immediate delivery instead of waiting for a schedule
    #[serde(default = "default_true")]
    pub immediate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            kind: None,
            on_create: true,
            immediate: true,
        }
    }
}

impl NotifySettings {
    pub fn check(&self, on_create: bool, immediate: bool) -> Option<NotifyPlan> {
        let kind = self.kind?;
        if on_create && !self.on_create {
            return None;
        }
        if immediate && !self.immediate {
            return None;
        }
        Some(NotifyPlan { kind })
    }
}

/// A configured bot: when it fires, who it affects, and how it reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRule {
    pub id: u64,
    pub title: String,
    /// Event type tag the rule listens to
    pub type_tag: String,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Notify the group's leaders instead of the applicant
    #[serde(default)]
    pub change_affected: bool,
    #[serde(default)]
    pub enable_log: bool,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub notify: NotifySettings,
}

impl NotificationRule {
    pub fn event_kind(&self) -> Option<EventKind> {
        EventKind::from_rule_tag(&self.type_tag)
    }

    /// Rules with an unknown tag or switched off are never served
    pub fn is_valid(&self) -> bool {
        self.active && self.event_kind().is_some()
    }

    pub fn check_notify(&self, on_create: bool, immediate: bool) -> Option<NotifyPlan> {
        self.notify.check(on_create, immediate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_notify_without_kind() {
        let settings = NotifySettings::default();
        assert_eq!(settings.check(true, true), None);
    }

    #[test]
    fn test_check_notify_context_flags() {
        let settings = NotifySettings {
            kind: Some(NotifyKind::Conversation),
            on_create: true,
            immediate: false,
        };
        assert_eq!(settings.check(true, true), None);
        assert_eq!(
            settings.check(true, false),
            Some(NotifyPlan {
                kind: NotifyKind::Conversation
            })
        );

        let no_create = NotifySettings {
            kind: Some(NotifyKind::Email),
            on_create: false,
            immediate: true,
        };
        assert_eq!(no_create.check(true, true), None);
        assert!(no_create.check(false, true).is_some());
    }

    #[test]
    fn test_rule_defaults_from_json() {
        let rule: NotificationRule = serde_json::from_value(json!({
            "id": 3,
            "title": "Tell leaders",
            "type_tag": "usergroup_apply",
            "change_affected": true,
            "notify": { "kind": "conversation" }
        }))
        .unwrap();

        assert!(rule.active);
        assert!(!rule.enable_log);
        assert!(!rule.test_mode);
        assert!(rule.notify.on_create);
        assert!(rule.is_valid());
        assert_eq!(rule.event_kind(), Some(EventKind::Submitted));
    }

    #[test]
    fn test_rule_validity() {
        let mut rule: NotificationRule = serde_json::from_value(json!({
            "id": 1,
            "title": "x",
            "type_tag": "user_birthday"
        }))
        .unwrap();
        assert!(!rule.is_valid());

        rule.type_tag = "usergroup_apply_revoke".to_string();
        assert!(rule.is_valid());

        rule.active = false;
        assert!(!rule.is_valid());
    }
}
