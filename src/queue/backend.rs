//! Backend trait for the notification job queue.
//!
//! The pipeline only hands jobs over; executing them (and retrying failed
//! deliveries) is the job consumer's business.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::dispatch::NotificationJob;

/// Errors that can occur during queue backend operations.
#[derive(Debug, Error)]
pub enum QueueBackendError {
    /// Queue has reached its pending-job limit
    #[error("Job queue full (pending: {pending})")]
    QueueFull { pending: usize },

    /// Redis operation failed
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Statistics about the queue backend.
#[derive(Debug, Clone, Serialize)]
pub struct QueueBackendStats {
    /// Backend type identifier
    pub backend_type: String,

    /// Jobs waiting for the consumer
    pub pending: usize,

    /// Jobs accepted since startup
    pub total_enqueued: u64,
}

/// Destination for notification jobs.
///
/// # Thread Safety
///
/// Implementations are shared across request handlers and must be
/// `Send + Sync`.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Backend type identifier
    fn backend_type(&self) -> &'static str;

    /// Hand a job to the consumer.
    async fn enqueue(&self, job: NotificationJob) -> Result<(), QueueBackendError>;

    /// Get queue statistics.
    async fn stats(&self) -> QueueBackendStats;
}
