//! Event-to-notification dispatch.
//!
//! A `DomainEvent` flows through `NotificationDispatchPipeline::dispatch`:
//! rule lookup, recipient resolution per rule, optional bot log entry,
//! eligibility check and finally a `NotificationJob` on the job queue.

mod event;
mod job;
mod pipeline;
mod placeholders;

pub use event::{
    ActorContext, ApplicantProfile, Application, ApplicationChange, DomainEvent, EventKind,
    GroupId, GroupRef, UserId,
};
pub use job::NotificationJob;
pub use pipeline::{
    Collaborators, DispatchConfig, DispatchError, DispatchOutcome, DispatcherStats,
    DispatcherStatsSnapshot, EnqueuedJob, NotificationDispatchPipeline, SkipReason,
};
pub use placeholders::{PlaceholderSet, GROUP_NAME_KEY};
