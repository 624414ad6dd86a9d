use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a user in the host system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user group in the host system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user currently performing the action that raised an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: UserId,
}

impl ActorContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Profile data of the user who applied for group membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    /// Unknown or hidden birthdays render as an empty age
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub profile_url: String,
}

impl ApplicantProfile {
    /// Age in whole years on the given date
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        let birthday = self.birthday?;
        if birthday > date {
            return None;
        }

        let mut years = date.year() - birthday.year();
        if (date.month(), date.day()) < (birthday.month(), birthday.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Age in whole years as of today (UTC)
    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }
}

/// Group an application targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub group_id: GroupId,
    pub group_name: String,
}

/// A group membership application as stored by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub application_id: u64,
    pub applicant: ApplicantProfile,
    pub group: GroupRef,
    #[serde(default)]
    pub reason: String,
}

/// Fields submitted with an application update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Lifecycle event raised for a group application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ApplicationSubmitted {
        application: Application,
    },
    ApplicationChanged {
        application: Application,
        #[serde(default)]
        change: ApplicationChange,
    },
    ApplicationRevoked {
        application: Application,
    },
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ApplicationSubmitted { .. } => EventKind::Submitted,
            Self::ApplicationChanged { .. } => EventKind::Changed,
            Self::ApplicationRevoked { .. } => EventKind::Revoked,
        }
    }

    pub fn application(&self) -> &Application {
        match self {
            Self::ApplicationSubmitted { application }
            | Self::ApplicationChanged { application, .. }
            | Self::ApplicationRevoked { application } => application,
        }
    }

    pub fn applicant(&self) -> &ApplicantProfile {
        &self.application().applicant
    }

    /// Reason text placeholders are built from.
    ///
    /// Updates carry the new reason in their payload; it replaces the stored one.
    pub fn effective_reason(&self) -> &str {
        match self {
            Self::ApplicationChanged {
                change:
                    ApplicationChange {
                        reason: Some(reason),
                    },
                ..
            } => reason,
            _ => &self.application().reason,
        }
    }
}

/// Event type tag plus the per-kind dispatch policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Submitted,
    Changed,
    Revoked,
}

struct KindPolicy {
    rule_tag: &'static str,
    owner_only: bool,
}

const SUBMITTED: KindPolicy = KindPolicy {
    rule_tag: "usergroup_apply",
    owner_only: false,
};

const CHANGED: KindPolicy = KindPolicy {
    rule_tag: "usergroup_apply_change",
    owner_only: true,
};

const REVOKED: KindPolicy = KindPolicy {
    rule_tag: "usergroup_apply_revoke",
    owner_only: true,
};

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Submitted, EventKind::Changed, EventKind::Revoked];

    fn policy(self) -> &'static KindPolicy {
        match self {
            Self::Submitted => &SUBMITTED,
            Self::Changed => &CHANGED,
            Self::Revoked => &REVOKED,
        }
    }

    /// Key rules for this event type are cached under
    pub fn rule_tag(self) -> &'static str {
        self.policy().rule_tag
    }

    /// Whether only the applicant may trigger notifications for this kind
    pub fn owner_only(self) -> bool {
        self.policy().owner_only
    }

    pub fn from_rule_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.rule_tag() == tag)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn applicant() -> ApplicantProfile {
        ApplicantProfile {
            user_id: UserId(42),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 6, 15),
            profile_url: "https://example.com/user/42".to_string(),
        }
    }

    fn application() -> Application {
        Application {
            application_id: 7,
            applicant: applicant(),
            group: GroupRef {
                group_id: GroupId(5),
                group_name: "wcf.group.moderators".to_string(),
            },
            reason: "original".to_string(),
        }
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let profile = applicant();
        assert_eq!(profile.age_on(NaiveDate::from_ymd_opt(2020, 6, 14).unwrap()), Some(29));
        assert_eq!(profile.age_on(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()), Some(30));
        assert_eq!(profile.age_on(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()), None);

        let hidden = ApplicantProfile {
            birthday: None,
            ..applicant()
        };
        assert_eq!(hidden.age(), None);
    }

    #[test]
    fn test_effective_reason() {
        let changed = DomainEvent::ApplicationChanged {
            application: application(),
            change: ApplicationChange {
                reason: Some("updated".to_string()),
            },
        };
        assert_eq!(changed.effective_reason(), "updated");

        let unchanged = DomainEvent::ApplicationChanged {
            application: application(),
            change: ApplicationChange::default(),
        };
        assert_eq!(unchanged.effective_reason(), "original");

        let revoked = DomainEvent::ApplicationRevoked {
            application: application(),
        };
        assert_eq!(revoked.effective_reason(), "original");
    }

    #[test]
    fn test_kind_policy_table() {
        assert_eq!(EventKind::Submitted.rule_tag(), "usergroup_apply");
        assert_eq!(EventKind::Changed.rule_tag(), "usergroup_apply_change");
        assert_eq!(EventKind::Revoked.rule_tag(), "usergroup_apply_revoke");

        assert!(!EventKind::Submitted.owner_only());
        assert!(EventKind::Changed.owner_only());
        assert!(EventKind::Revoked.owner_only());

        assert_eq!(
            EventKind::from_rule_tag("usergroup_apply_revoke"),
            Some(EventKind::Revoked)
        );
        assert_eq!(EventKind::from_rule_tag("user_birthday"), None);
    }

    #[test]
    fn test_event_deserialization() {
        let event: DomainEvent = serde_json::from_value(json!({
            "type": "application_changed",
            "application": {
                "application_id": 7,
                "applicant": {
                    "user_id": 42,
                    "username": "alice",
                    "email": "alice@example.com",
                    "profile_url": "https://example.com/user/42"
                },
                "group": { "group_id": 5, "group_name": "Moderators" },
                "reason": "please"
            },
            "change": { "reason": "pretty please" }
        }))
        .unwrap();

        assert_eq!(event.kind(), EventKind::Changed);
        assert_eq!(event.applicant().user_id, UserId(42));
        assert_eq!(event.effective_reason(), "pretty please");
    }
}
