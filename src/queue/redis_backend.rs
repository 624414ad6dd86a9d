//! Redis-based job queue backend using Redis Streams.
//!
//! Every job is appended to a single stream as a JSON `data` field; an
//! external worker consumes the stream through a consumer group.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use redis::aio::ConnectionManager;

use crate::dispatch::NotificationJob;

use super::backend::{JobQueue, QueueBackendError, QueueBackendStats};

/// Redis Streams job queue.
pub struct RedisJobQueue {
    /// Auto-reconnecting connection
    conn: ConnectionManager,

    /// Stream the jobs are appended to
    stream_key: String,

    /// Approximate stream length cap (`MAXLEN ~`)
    max_len: usize,

    total_enqueued: AtomicU64,
}

impl RedisJobQueue {
    /// Connect to Redis and create the queue.
    pub async fn connect(
        url: &str,
        stream_key: impl Into<String>,
        max_len: usize,
    ) -> Result<Self, QueueBackendError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            stream_key: stream_key.into(),
            max_len,
            total_enqueued: AtomicU64::new(0),
        })
    }

    pub fn stream_key(&self) -> &str {
        &self.stream_key
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    fn backend_type(&self) -> &'static str {
        "redis"
    }

    async fn enqueue(&self, job: NotificationJob) -> Result<(), QueueBackendError> {
        let payload = serde_json::to_string(&job)?;
        let mut conn = self.conn.clone();

        let stream_id: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_len)
            .arg("*")
            .arg("data")
            .arg(payload)
            .query_async(&mut conn)
            .await?;

        self.total_enqueued.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            job_id = %job.id,
            stream_id = %stream_id,
            key = %self.stream_key,
            "Job appended to Redis stream"
        );

        Ok(())
    }

    async fn stats(&self) -> QueueBackendStats {
        let mut conn = self.conn.clone();
        let pending: usize = match redis::cmd("XLEN")
            .arg(&self.stream_key)
            .query_async(&mut conn)
            .await
        {
            Ok(len) => len,
            Err(e) => {
                tracing::warn!(error = %e, key = %self.stream_key, "Failed to read stream length");
                0
            }
        };

        QueueBackendStats {
            backend_type: self.backend_type().to_string(),
            pending,
            total_enqueued: self.total_enqueued.load(Ordering::Relaxed),
        }
    }
}
