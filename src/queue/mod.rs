//! Notification job queue.
//!
//! # Architecture
//!
//! The queue uses a backend abstraction so the dispatch pipeline does not
//! care where jobs end up:
//!
//! - `MemoryJobQueue`: bounded in-process FIFO (default), drained by a
//!   `JobConsumer` task
//! - `RedisJobQueue`: Redis Stream consumed by an external worker
//!
//! Use `create_job_queue()` to create the appropriate backend based on configuration.

pub mod backend;
mod consumer;
mod factory;
pub mod memory_backend;
pub mod redis_backend;

pub use backend::{JobQueue, QueueBackendError, QueueBackendStats};
pub use consumer::{JobConsumer, JobHandler, TracingJobHandler};
pub use factory::{create_job_queue, JobQueueBackend};
pub use memory_backend::MemoryJobQueue;
pub use redis_backend::RedisJobQueue;
