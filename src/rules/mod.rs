//! Notification rules ("bots") and the cache they are served from.

mod cache;
mod loader;
mod types;

pub use cache::{MemoryRuleCache, RuleCache};
pub use loader::{load_rules_file, RuleLoadError};
pub use types::{NotificationRule, NotifyKind, NotifyPlan, NotifySettings};
