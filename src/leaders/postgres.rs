use async_trait::async_trait;
use sqlx::PgPool;

use crate::dispatch::{GroupId, UserId};

use super::{LeaderError, LeaderResolver};

/// Leader lookup against the host's `user_group_leader` table.
pub struct PostgresLeaderResolver {
    pool: PgPool,
}

impl PostgresLeaderResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderResolver for PostgresLeaderResolver {
    async fn get_leaders(&self, group_id: GroupId) -> Result<Vec<UserId>, LeaderError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT leader_id
            FROM user_group_leader
            WHERE group_id = $1
            ORDER BY leader_id
            "#,
        )
        .bind(group_id.0 as i64)
        .fetch_all(&self.pool)
        .await?;

        tracing::trace!(
            group_id = %group_id,
            leaders = rows.len(),
            "Resolved group leaders from PostgreSQL"
        );

        Ok(leader_ids(group_id, rows))
    }
}

/// Convert `leader_id` rows; negative ids are reported and skipped.
fn leader_ids(group_id: GroupId, rows: Vec<(i64,)>) -> Vec<UserId> {
    rows.into_iter()
        .filter_map(|(id,)| match u64::try_from(id) {
            Ok(id) => Some(UserId(id)),
            Err(_) => {
                tracing::warn!(
                    group_id = %group_id,
                    leader_id = id,
                    "Skipping leader row with negative id"
                );
                None
            }
        })
        .collect()
}
