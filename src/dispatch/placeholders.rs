use serde::{Deserialize, Serialize};

use super::event::{DomainEvent, UserId};

/// Placeholder key that must be localized by the job consumer
pub const GROUP_NAME_KEY: &str = "group-name";

/// Values notification templates can reference.
///
/// Built once per event and shared read-only by every matching rule.
/// Serialized with the key names existing bot templates use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlaceholderSet {
    /// Empty when the applicant's age is unknown
    pub applicant_age: String,
    pub applicant_email: String,
    pub applicant_id: UserId,
    pub applicant_name: String,
    pub applicant_profile: String,
    pub applicant_reason: String,
    pub count: u32,
    pub count_user: u32,
    pub group_name: String,
    /// Keys whose values are language variables
    pub translate: Vec<String>,
}

impl PlaceholderSet {
    pub fn from_event(event: &DomainEvent) -> Self {
        let application = event.application();
        let applicant = &application.applicant;

        Self {
            applicant_age: applicant
                .age()
                .map(|age| age.to_string())
                .unwrap_or_default(),
            applicant_email: applicant.email.clone(),
            applicant_id: applicant.user_id,
            applicant_name: applicant.username.clone(),
            applicant_profile: applicant.profile_url.clone(),
            applicant_reason: event.effective_reason().to_string(),
            count: 1,
            count_user: 1,
            group_name: application.group.group_name.clone(),
            translate: vec![GROUP_NAME_KEY.to_string()],
        }
    }

    pub fn needs_translation(&self, key: &str) -> bool {
        self.translate.iter().any(|k| k == key)
    }

    /// JSON object keyed like the serialized job.
    ///
    /// Job consumers pass it to `i18n::substitute_string` to render bot templates.
    pub fn to_variables(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
