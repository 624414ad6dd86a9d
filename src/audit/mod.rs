//! Bot log.
//!
//! Rules with logging enabled record one `AuditLogEntry` per dispatch.
//! Test-mode rules store a preview of what would be sent instead of the
//! plain affected-user description.

mod entry;
mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use entry::{
    truncate_preview, AuditLogEntry, TestModePayload, MAX_PREVIEW_CHARS, TRUNCATION_SUFFIX,
};
pub use memory::{MemoryAuditLog, DEFAULT_MEMORY_LOG_CAPACITY};
pub use postgres::PostgresAuditLog;

#[derive(Debug, Error)]
pub enum AuditLogError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Audit log unavailable: {0}")]
    Unavailable(String),
}

/// Sink for bot log entries.
#[async_trait]
pub trait AuditLogWriter: Send + Sync {
    async fn write(&self, entry: AuditLogEntry) -> Result<(), AuditLogError>;
}
