//! In-memory job queue backend.
//!
//! Jobs are kept in a FIFO and are lost on service restart. A `JobConsumer`
//! task drains the queue in-process; without one the queue fills up and
//! rejects further jobs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use crate::dispatch::NotificationJob;
use crate::metrics::QUEUE_PENDING;

use super::backend::{JobQueue, QueueBackendError, QueueBackendStats};

/// Bounded in-memory job queue.
pub struct MemoryJobQueue {
    jobs: Mutex<VecDeque<NotificationJob>>,
    /// Signalled on every accepted job
    ready: Notify,
    max_pending: usize,
    total_enqueued: AtomicU64,
}

impl MemoryJobQueue {
    pub fn new(max_pending: usize) -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            ready: Notify::new(),
            max_pending,
            total_enqueued: AtomicU64::new(0),
        }
    }

    /// Take every pending job, oldest first.
    pub async fn drain(&self) -> Vec<NotificationJob> {
        let mut jobs = self.jobs.lock().await;
        let drained: Vec<_> = jobs.drain(..).collect();
        QUEUE_PENDING.set(0);
        drained
    }

    /// Take the oldest pending job
    pub async fn pop(&self) -> Option<NotificationJob> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.pop_front();
        QUEUE_PENDING.set(jobs.len() as i64);
        job
    }

    pub fn capacity(&self) -> usize {
        self.max_pending
    }

    pub async fn pending(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Resolve once a job has been enqueued since the last wake-up.
    pub async fn wait_for_jobs(&self) {
        self.ready.notified().await;
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn enqueue(&self, job: NotificationJob) -> Result<(), QueueBackendError> {
        let mut jobs = self.jobs.lock().await;

        if jobs.len() >= self.max_pending {
            tracing::warn!(
                job_id = %job.id,
                pending = jobs.len(),
                "Job queue full, rejecting job"
            );
            return Err(QueueBackendError::QueueFull {
                pending: jobs.len(),
            });
        }

        let job_id = job.id;
        jobs.push_back(job);
        self.total_enqueued.fetch_add(1, Ordering::Relaxed);
        QUEUE_PENDING.set(jobs.len() as i64);
        self.ready.notify_one();

        tracing::debug!(job_id = %job_id, pending = jobs.len(), "Job enqueued in memory");

        Ok(())
    }

    async fn stats(&self) -> QueueBackendStats {
        QueueBackendStats {
            backend_type: self.backend_type().to_string(),
            pending: self.pending().await,
            total_enqueued: self.total_enqueued.load(Ordering::Relaxed),
        }
    }
}
