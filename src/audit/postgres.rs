use async_trait::async_trait;
use sqlx::PgPool;

use super::{AuditLogEntry, AuditLogError, AuditLogWriter};

/// Writes entries to the `bot_log` table.
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogWriter for PostgresAuditLog {
    async fn write(&self, entry: AuditLogEntry) -> Result<(), AuditLogError> {
        sqlx::query(
            r#"
            INSERT INTO bot_log (id, bot_id, bot_title, count, test_mode, additional_data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.rule_id as i64)
        .bind(&entry.rule_title)
        .bind(entry.count as i32)
        .bind(entry.test_mode)
        .bind(&entry.additional_data)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        tracing::trace!(
            entry_id = %entry.id,
            rule_id = entry.rule_id,
            test_mode = entry.test_mode,
            "Bot log entry written to PostgreSQL"
        );

        Ok(())
    }
}
