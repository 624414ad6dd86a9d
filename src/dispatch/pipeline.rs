use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::audit::{AuditLogEntry, AuditLogError, AuditLogWriter};
use crate::i18n::{Localizer, LOG_TEST, LOG_USER_AFFECTED};
use crate::leaders::{LeaderError, LeaderResolver};
use crate::metrics::DispatchMetrics;
use crate::queue::{JobQueue, QueueBackendError};
use crate::rules::{NotificationRule, RuleCache};

use super::event::{ActorContext, DomainEvent, EventKind, UserId};
use super::job::NotificationJob;
use super::placeholders::PlaceholderSet;

/// Feature switch and other dispatch-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    pub enabled: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// External components the pipeline reads from and writes to
#[derive(Clone)]
pub struct Collaborators {
    pub rules: Arc<dyn RuleCache>,
    pub leaders: Arc<dyn LeaderResolver>,
    pub localizer: Arc<dyn Localizer>,
    pub audit_log: Arc<dyn AuditLogWriter>,
    pub queue: Arc<dyn JobQueue>,
}

/// Collaborator failure that aborted a dispatch.
///
/// Jobs and log entries produced for earlier rules stay in place.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Leader lookup failed: {0}")]
    LeaderLookup(#[from] LeaderError),

    #[error("Bot log write failed: {0}")]
    AuditLog(#[from] AuditLogError),

    #[error("Enqueue failed: {0}")]
    Enqueue(#[from] QueueBackendError),
}

impl DispatchError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::LeaderLookup(_) => "leaders",
            Self::AuditLog(_) => "audit_log",
            Self::Enqueue(_) => "enqueue",
        }
    }
}

/// Why an event produced no work at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    FeatureDisabled,
    ActorMismatch,
    NoMatchingRules,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeatureDisabled => "feature_disabled",
            Self::ActorMismatch => "actor_mismatch",
            Self::NoMatchingRules => "no_matching_rules",
        }
    }
}

/// A job the pipeline handed to the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnqueuedJob {
    pub job_id: Uuid,
    pub rule_id: u64,
    pub recipients: Vec<UserId>,
}

/// What a single dispatch did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub event_type: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub rules_matched: usize,
    pub jobs: Vec<EnqueuedJob>,
    /// Rules whose eligibility check declined to notify
    pub declined_rules: Vec<u64>,
    pub log_entries: usize,
}

impl DispatchOutcome {
    fn new(event_type: EventKind) -> Self {
        Self {
            event_type,
            skipped: None,
            rules_matched: 0,
            jobs: Vec::new(),
            declined_rules: Vec::new(),
            log_entries: 0,
        }
    }

    fn skipped(event_type: EventKind, reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::new(event_type)
        }
    }

    pub fn is_noop(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Statistics for the dispatch pipeline
#[derive(Debug, Default)]
pub struct DispatcherStats {
    pub events_received: AtomicU64,
    pub events_skipped: AtomicU64,
    pub rules_matched: AtomicU64,
    pub rules_declined: AtomicU64,
    pub jobs_enqueued: AtomicU64,
    pub log_entries: AtomicU64,
    pub failures: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_skipped: self.events_skipped.load(Ordering::Relaxed),
            rules_matched: self.rules_matched.load(Ordering::Relaxed),
            rules_declined: self.rules_declined.load(Ordering::Relaxed),
            jobs_enqueued: self.jobs_enqueued.load(Ordering::Relaxed),
            log_entries: self.log_entries.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub events_received: u64,
    pub events_skipped: u64,
    pub rules_matched: u64,
    pub rules_declined: u64,
    pub jobs_enqueued: u64,
    pub log_entries: u64,
    pub failures: u64,
}

/// Turns application lifecycle events into bot log entries and notification jobs.
///
/// Every event kind runs the same steps; `EventKind` supplies the rule tag
/// and whether the actor has to be the applicant.
pub struct NotificationDispatchPipeline {
    config: DispatchConfig,
    collaborators: Collaborators,
    stats: DispatcherStats,
}

impl NotificationDispatchPipeline {
    pub fn new(config: DispatchConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            stats: DispatcherStats::default(),
        }
    }

    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn queue(&self) -> &Arc<dyn JobQueue> {
        &self.collaborators.queue
    }

    pub fn rules(&self) -> &Arc<dyn RuleCache> {
        &self.collaborators.rules
    }

    /// Dispatch one event on behalf of `actor`.
    ///
    /// Returns a no-op outcome when the feature is off, the actor may not
    /// act on the application, or no rule listens to the event type.
    #[tracing::instrument(
        name = "pipeline.dispatch",
        skip(self, actor, event),
        fields(
            event_type = %event.kind(),
            application_id = event.application().application_id,
            actor_id = %actor.user_id
        )
    )]
    pub async fn dispatch(
        &self,
        actor: &ActorContext,
        event: &DomainEvent,
    ) -> Result<DispatchOutcome, DispatchError> {
        let kind = event.kind();
        let started = Instant::now();
        self.stats.events_received.fetch_add(1, Ordering::Relaxed);
        DispatchMetrics::record_event(kind.rule_tag());

        if !self.config.enabled {
            return Ok(self.skip(kind, SkipReason::FeatureDisabled));
        }

        if kind.owner_only() && event.applicant().user_id != actor.user_id {
            return Ok(self.skip(kind, SkipReason::ActorMismatch));
        }

        let rules = self.collaborators.rules.get_rules(kind.rule_tag());
        if rules.is_empty() {
            return Ok(self.skip(kind, SkipReason::NoMatchingRules));
        }

        let placeholders = PlaceholderSet::from_event(event);
        let mut outcome = DispatchOutcome::new(kind);
        outcome.rules_matched = rules.len();
        self.stats
            .rules_matched
            .fetch_add(rules.len() as u64, Ordering::Relaxed);
        DispatchMetrics::record_rules_matched(rules.len());

        for rule in rules.iter() {
            if let Err(e) = self
                .process_rule(rule, event, &placeholders, &mut outcome)
                .await
            {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                DispatchMetrics::record_failure(e.stage());
                tracing::error!(
                    rule_id = rule.id,
                    stage = e.stage(),
                    error = %e,
                    jobs_enqueued = outcome.jobs.len(),
                    "Dispatch aborted by collaborator failure"
                );
                return Err(e);
            }
        }

        DispatchMetrics::observe_latency(started.elapsed().as_secs_f64());

        tracing::debug!(
            rules_matched = outcome.rules_matched,
            jobs = outcome.jobs.len(),
            declined = outcome.declined_rules.len(),
            log_entries = outcome.log_entries,
            "Event dispatched"
        );

        Ok(outcome)
    }

    async fn process_rule(
        &self,
        rule: &NotificationRule,
        event: &DomainEvent,
        placeholders: &PlaceholderSet,
        outcome: &mut DispatchOutcome,
    ) -> Result<(), DispatchError> {
        let recipients = self.resolve_recipients(rule, event).await?;

        // Logged whether or not the rule goes on to notify
        if rule.enable_log {
            self.write_log(rule, &recipients).await?;
            outcome.log_entries += 1;
        }

        if rule.check_notify(true, true).is_none() {
            tracing::debug!(rule_id = rule.id, "Rule declined to notify");
            self.stats.rules_declined.fetch_add(1, Ordering::Relaxed);
            DispatchMetrics::record_declined();
            outcome.declined_rules.push(rule.id);
            return Ok(());
        }

        let job = NotificationJob::new(rule.clone(), placeholders.clone(), recipients.clone());
        let job_id = job.id;
        self.collaborators.queue.enqueue(job).await?;

        self.stats.jobs_enqueued.fetch_add(1, Ordering::Relaxed);
        DispatchMetrics::record_enqueued();

        tracing::info!(
            job_id = %job_id,
            rule_id = rule.id,
            recipients = recipients.len(),
            test_mode = rule.test_mode,
            "Notification job enqueued"
        );

        outcome.jobs.push(EnqueuedJob {
            job_id,
            rule_id: rule.id,
            recipients,
        });

        Ok(())
    }

    /// The applicant, or the target group's leaders for `change_affected` rules
    async fn resolve_recipients(
        &self,
        rule: &NotificationRule,
        event: &DomainEvent,
    ) -> Result<Vec<UserId>, LeaderError> {
        if !rule.change_affected {
            return Ok(vec![event.applicant().user_id]);
        }

        let group_id = event.application().group.group_id;
        let leaders = self.collaborators.leaders.get_leaders(group_id).await?;
        if leaders.is_empty() {
            tracing::debug!(rule_id = rule.id, group_id = %group_id, "Group has no leaders");
        }
        Ok(leaders)
    }

    async fn write_log(
        &self,
        rule: &NotificationRule,
        recipients: &[UserId],
    ) -> Result<(), AuditLogError> {
        let user_ids = join_user_ids(recipients);

        let entry = if rule.test_mode {
            let preview = self.collaborators.localizer.render(
                LOG_TEST,
                &json!({
                    "objects": 1,
                    "users": recipients.len(),
                    "userIDs": user_ids,
                }),
            );
            AuditLogEntry::test_preview(rule, &preview)
        } else {
            let description = self.collaborators.localizer.render(
                LOG_USER_AFFECTED,
                &json!({
                    "total": 1,
                    "userIDs": user_ids,
                }),
            );
            AuditLogEntry::affected(rule, description)
        };

        let test_mode = entry.test_mode;
        self.collaborators.audit_log.write(entry).await?;

        self.stats.log_entries.fetch_add(1, Ordering::Relaxed);
        DispatchMetrics::record_log_entry(test_mode);
        Ok(())
    }

    fn skip(&self, kind: EventKind, reason: SkipReason) -> DispatchOutcome {
        self.stats.events_skipped.fetch_add(1, Ordering::Relaxed);
        DispatchMetrics::record_skipped(reason.as_str());
        tracing::debug!(event_type = %kind, reason = reason.as_str(), "Event skipped");
        DispatchOutcome::skipped(kind, reason)
    }
}

fn join_user_ids(ids: &[UserId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
