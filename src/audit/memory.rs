use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::metrics::LOG_ENTRIES_EVICTED_TOTAL;

use super::{AuditLogEntry, AuditLogError, AuditLogWriter};

/// Entries kept by `MemoryAuditLog::new`
pub const DEFAULT_MEMORY_LOG_CAPACITY: usize = 10_000;

/// Keeps the most recent log entries in memory, oldest first.
///
/// At capacity the oldest entry is dropped for each new one.
pub struct MemoryAuditLog {
    entries: RwLock<VecDeque<AuditLogEntry>>,
    capacity: usize,
    evicted: AtomicU64,
}

impl Default for MemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
            evicted: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries dropped so far to stay within capacity
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    pub async fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditLogWriter for MemoryAuditLog {
    async fn write(&self, entry: AuditLogEntry) -> Result<(), AuditLogError> {
        let mut entries = self.entries.write().await;
        while entries.len() >= self.capacity {
            if let Some(dropped) = entries.pop_front() {
                self.evicted.fetch_add(1, Ordering::Relaxed);
                LOG_ENTRIES_EVICTED_TOTAL.inc();
                tracing::trace!(entry_id = %dropped.id, "Evicted oldest in-memory bot log entry");
            }
        }
        entries.push_back(entry);
        Ok(())
    }
}
