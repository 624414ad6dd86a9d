//! In-process consumer for the memory job queue.
//!
//! Wakes whenever a job is accepted, drains the queue and hands every job
//! to a `JobHandler`. Runs until the shutdown signal fires, then drains
//! once more so accepted jobs are not dropped silently.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::dispatch::NotificationJob;
use crate::metrics::JOBS_CONSUMED_TOTAL;

use super::memory_backend::MemoryJobQueue;

/// Receives jobs taken off the memory queue.
#[async_trait]
pub trait JobHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, job: NotificationJob);
}

/// Writes every job to the log as JSON.
///
/// Used when no external scheduler is attached (development, memory mode).
pub struct TracingJobHandler;

#[async_trait]
impl JobHandler for TracingJobHandler {
    fn name(&self) -> &'static str {
        "tracing"
    }

    async fn handle(&self, job: NotificationJob) {
        match serde_json::to_string(&job) {
            Ok(payload) => tracing::info!(
                job_id = %job.id,
                rule_id = job.rule.id,
                recipients = job.affected_user_ids.len(),
                payload = %payload,
                "Notification job handed off"
            ),
            Err(e) => tracing::error!(
                job_id = %job.id,
                error = %e,
                "Failed to serialize notification job"
            ),
        }
    }
}

/// Background task draining a `MemoryJobQueue`
pub struct JobConsumer {
    queue: Arc<MemoryJobQueue>,
    handler: Arc<dyn JobHandler>,
    shutdown: broadcast::Receiver<()>,
}

impl JobConsumer {
    pub fn new(
        queue: Arc<MemoryJobQueue>,
        handler: Arc<dyn JobHandler>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            queue,
            handler,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(handler = self.handler.name(), "Job consumer started");

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("Job consumer received shutdown signal");
                    break;
                }
                _ = self.queue.wait_for_jobs() => {
                    self.drain_once().await;
                }
            }
        }

        let remaining = self.drain_once().await;
        tracing::info!(remaining = remaining, "Job consumer stopped");
    }

    /// Hand off every pending job; returns how many were handled.
    pub async fn drain_once(&self) -> usize {
        let jobs = self.queue.drain().await;
        let count = jobs.len();

        for job in jobs {
            self.handler.handle(job).await;
            JOBS_CONSUMED_TOTAL.inc();
        }

        if count > 0 {
            tracing::debug!(jobs = count, "Drained memory job queue");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::Mutex;

    use crate::dispatch::{
        ApplicantProfile, Application, DomainEvent, GroupId, GroupRef, PlaceholderSet, UserId,
    };
    use crate::queue::JobQueue;
    use crate::rules::NotificationRule;

    #[derive(Default)]
    struct CollectingHandler {
        rule_ids: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl JobHandler for CollectingHandler {
        fn name(&self) -> &'static str {
            "collecting"
        }

        async fn handle(&self, job: NotificationJob) {
            self.rule_ids.lock().await.push(job.rule.id);
        }
    }

    fn job(rule_id: u64) -> NotificationJob {
        let event = DomainEvent::ApplicationRevoked {
            application: Application {
                application_id: 9,
                applicant: ApplicantProfile {
                    user_id: UserId(3),
                    username: "ines".to_string(),
                    email: "ines@example.com".to_string(),
                    birthday: None,
                    profile_url: "https://example.com/user/3".to_string(),
                },
                group: GroupRef {
                    group_id: GroupId(2),
                    group_name: "Editors".to_string(),
                },
                reason: String::new(),
            },
        };
        let rule: NotificationRule = serde_json::from_value(serde_json::json!({
            "id": rule_id,
            "title": "revoked",
            "type_tag": "usergroup_apply_revoke"
        }))
        .unwrap();
        NotificationJob::new(rule, PlaceholderSet::from_event(&event), vec![UserId(3)])
    }

    #[tokio::test]
    async fn test_consumer_frees_capacity() {
        let queue = Arc::new(MemoryJobQueue::new(2));
        let handler = Arc::new(CollectingHandler::default());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let consumer = JobConsumer::new(queue.clone(), handler.clone(), shutdown_rx);
        let task = tokio::spawn(consumer.run());

        for rule_id in 1..=5 {
            queue.enqueue(job(rule_id)).await.unwrap();
            tokio::time::timeout(Duration::from_secs(5), async {
                while queue.pending().await > 0 {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
            .await
            .unwrap();
        }

        shutdown_tx.send(()).unwrap();
        task.await.unwrap();

        assert_eq!(*handler.rule_ids.lock().await, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_shutdown_drains_remaining_jobs() {
        let queue = Arc::new(MemoryJobQueue::new(10));
        let handler = Arc::new(CollectingHandler::default());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        queue.enqueue(job(1)).await.unwrap();
        queue.enqueue(job(2)).await.unwrap();
        shutdown_tx.send(()).unwrap();

        JobConsumer::new(queue.clone(), handler.clone(), shutdown_rx)
            .run()
            .await;

        assert_eq!(queue.pending().await, 0);
        assert_eq!(handler.rule_ids.lock().await.len(), 2);
    }
}
