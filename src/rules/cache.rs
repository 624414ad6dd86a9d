//! Rule cache keyed by event type tag

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::types::NotificationRule;

/// Read access to the active, valid rules for an event type.
///
/// Returned lists are snapshots: later reloads never change a list
/// a caller already holds.
pub trait RuleCache: Send + Sync {
    fn get_rules(&self, type_tag: &str) -> Arc<[NotificationRule]>;

    /// Number of rules currently served across all tags
    fn rule_count(&self) -> usize;
}

/// In-memory rule cache
pub struct MemoryRuleCache {
    rules: DashMap<String, Arc<[NotificationRule]>>,
}

impl Default for MemoryRuleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRuleCache {
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
        }
    }

    pub fn from_rules(rules: Vec<NotificationRule>) -> Self {
        let cache = Self::new();
        cache.replace_all(rules);
        cache
    }

    /// Swap in a new rule set. Inactive rules and unknown tags are dropped.
    ///
    /// Returns the number of rules kept.
    pub fn replace_all(&self, rules: Vec<NotificationRule>) -> usize {
        let total = rules.len();
        let mut grouped: HashMap<String, Vec<NotificationRule>> = HashMap::new();

        for rule in rules {
            if rule.is_valid() {
                grouped.entry(rule.type_tag.clone()).or_default().push(rule);
            } else {
                tracing::debug!(
                    rule_id = rule.id,
                    type_tag = %rule.type_tag,
                    active = rule.active,
                    "Skipping inactive or unknown rule"
                );
            }
        }

        let kept: usize = grouped.values().map(Vec::len).sum();

        self.rules.retain(|tag, _| grouped.contains_key(tag));
        for (tag, mut list) in grouped {
            list.sort_by_key(|rule| rule.id);
            self.rules.insert(tag, list.into());
        }

        tracing::info!(total = total, kept = kept, "Rule cache replaced");
        kept
    }

    /// Every cached rule, ordered by tag then id
    pub fn all(&self) -> Vec<NotificationRule> {
        let mut tags: Vec<String> = self.rules.iter().map(|e| e.key().clone()).collect();
        tags.sort();
        tags.iter()
            .flat_map(|tag| self.get_rules(tag).to_vec())
            .collect()
    }
}

impl RuleCache for MemoryRuleCache {
    fn get_rules(&self, type_tag: &str) -> Arc<[NotificationRule]> {
        self.rules
            .get(type_tag)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn rule_count(&self) -> usize {
        self.rules.iter().map(|entry| entry.value().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: u64, tag: &str, active: bool) -> NotificationRule {
        NotificationRule {
            id,
            title: format!("rule {}", id),
            type_tag: tag.to_string(),
            active,
            change_affected: false,
            enable_log: false,
            test_mode: false,
            notify: Default::default(),
        }
    }

    #[test]
    fn test_get_rules_by_tag() {
        let cache = MemoryRuleCache::from_rules(vec![
            rule(2, "usergroup_apply", true),
            rule(1, "usergroup_apply", true),
            rule(3, "usergroup_apply_revoke", true),
        ]);

        let rules = cache.get_rules("usergroup_apply");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, 1);
        assert_eq!(rules[1].id, 2);
        assert!(cache.get_rules("usergroup_apply_change").is_empty());
        assert_eq!(cache.rule_count(), 3);
    }

    #[test]
    fn test_filters_inactive_and_unknown() {
        let cache = MemoryRuleCache::new();
        let kept = cache.replace_all(vec![
            rule(1, "usergroup_apply", false),
            rule(2, "user_birthday", true),
            rule(3, "usergroup_apply", true),
        ]);

        assert_eq!(kept, 1);
        assert_eq!(cache.get_rules("usergroup_apply")[0].id, 3);
        assert!(cache.get_rules("user_birthday").is_empty());
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let cache = MemoryRuleCache::from_rules(vec![rule(1, "usergroup_apply", true)]);
        let snapshot = cache.get_rules("usergroup_apply");

        cache.replace_all(vec![rule(5, "usergroup_apply_change", true)]);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, 1);
        assert!(cache.get_rules("usergroup_apply").is_empty());
        assert_eq!(cache.all().len(), 1);
    }
}
