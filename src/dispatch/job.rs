use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rules::NotificationRule;

use super::event::UserId;
use super::placeholders::PlaceholderSet;

/// Work item handed to the notification scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "bot")]
    pub rule: NotificationRule,
    pub placeholders: PlaceholderSet,
    #[serde(rename = "affectedUserIDs")]
    pub affected_user_ids: Vec<UserId>,
    /// Per-recipient object counts; the scheduler accepts it but application
    /// events never fill it.
    #[serde(rename = "countToUserID", default)]
    pub count_to_user_id: BTreeMap<UserId, u32>,
}

impl NotificationJob {
    pub fn new(
        rule: NotificationRule,
        placeholders: PlaceholderSet,
        affected_user_ids: Vec<UserId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            rule,
            placeholders,
            affected_user_ids,
            count_to_user_id: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::event::{ApplicantProfile, Application, DomainEvent, GroupId, GroupRef};

    #[test]
    fn test_job_wire_keys() {
        let event = DomainEvent::ApplicationRevoked {
            application: Application {
                application_id: 2,
                applicant: ApplicantProfile {
                    user_id: UserId(8),
                    username: "carol".to_string(),
                    email: "carol@example.com".to_string(),
                    birthday: None,
                    profile_url: "https://example.com/user/8".to_string(),
                },
                group: GroupRef {
                    group_id: GroupId(1),
                    group_name: "Editors".to_string(),
                },
                reason: String::new(),
            },
        };
        let rule: NotificationRule = serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Revoked",
            "type_tag": "usergroup_apply_revoke"
        }))
        .unwrap();

        let job = NotificationJob::new(
            rule,
            PlaceholderSet::from_event(&event),
            vec![UserId(8)],
        );
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["bot"]["id"], 4);
        assert_eq!(value["affectedUserIDs"], serde_json::json!([8]));
        assert_eq!(value["countToUserID"], serde_json::json!({}));
        assert_eq!(value["placeholders"]["applicant-name"], "carol");

        let decoded: NotificationJob = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, job);
    }
}
