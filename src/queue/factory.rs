//! Queue backend factory

use std::sync::Arc;

use crate::config::QueueConfig;

use super::backend::JobQueue;
use super::memory_backend::MemoryJobQueue;
use super::redis_backend::RedisJobQueue;

/// Queue chosen at startup.
///
/// The memory variant stays concrete so the caller can attach a `JobConsumer`.
pub enum JobQueueBackend {
    Memory(Arc<MemoryJobQueue>),
    Redis(Arc<RedisJobQueue>),
}

impl JobQueueBackend {
    /// The queue as the pipeline sees it
    pub fn shared(&self) -> Arc<dyn JobQueue> {
        match self {
            Self::Memory(queue) => queue.clone() as Arc<dyn JobQueue>,
            Self::Redis(queue) => queue.clone() as Arc<dyn JobQueue>,
        }
    }

    /// The in-process queue, when one has to be drained locally
    pub fn memory(&self) -> Option<Arc<MemoryJobQueue>> {
        match self {
            Self::Memory(queue) => Some(queue.clone()),
            Self::Redis(_) => None,
        }
    }
}

/// Create a job queue based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend` setting:
/// - `"redis"`: Returns a `RedisJobQueue` if Redis is reachable
/// - `"memory"` (default): Returns a `MemoryJobQueue`
///
/// # Example
///
/// ```rust,ignore
/// let backend = create_job_queue(&settings.queue).await;
/// let queue = backend.shared();
/// ```
pub async fn create_job_queue(settings: &QueueConfig) -> JobQueueBackend {
    match settings.backend.as_str() {
        "redis" => {
            match RedisJobQueue::connect(&settings.redis_url, &settings.stream_key, settings.max_pending)
                .await
            {
                Ok(queue) => {
                    tracing::info!(
                        backend = "redis",
                        stream_key = %settings.stream_key,
                        "Creating Redis job queue"
                    );
                    JobQueueBackend::Redis(Arc::new(queue))
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Redis job queue requested but Redis is unreachable, falling back to memory"
                    );
                    JobQueueBackend::Memory(Arc::new(MemoryJobQueue::new(settings.max_pending)))
                }
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory job queue");
            JobQueueBackend::Memory(Arc::new(MemoryJobQueue::new(settings.max_pending)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_is_default() {
        let settings = QueueConfig {
            backend: "something-else".to_string(),
            ..QueueConfig::default()
        };
        let backend = create_job_queue(&settings).await;
        assert_eq!(backend.shared().backend_type(), "memory");
        assert!(backend.memory().is_some());
    }

    #[tokio::test]
    async fn test_redis_falls_back_to_memory() {
        let settings = QueueConfig {
            backend: "redis".to_string(),
            redis_url: "not-a-redis-url".to_string(),
            ..QueueConfig::default()
        };
        let backend = create_job_queue(&settings).await;
        assert_eq!(backend.shared().backend_type(), "memory");
    }
}
