//! Group leader lookup.
//!
//! Rules with `change_affected` set notify the leaders of the target group
//! instead of the applicant. Leaders are resolved through the
//! `LeaderResolver` trait:
//!
//! - `MemoryLeaderResolver`: static assignments held in a DashMap
//! - `PostgresLeaderResolver`: reads the host's `user_group_leader` table

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::dispatch::{GroupId, UserId};

pub use memory::MemoryLeaderResolver;
pub use postgres::PostgresLeaderResolver;

/// Errors from a leader lookup
#[derive(Debug, Error)]
pub enum LeaderError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Leader store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the leaders of a user group.
#[async_trait]
pub trait LeaderResolver: Send + Sync {
    /// Leader ids of the group; empty when the group has no leaders.
    async fn get_leaders(&self, group_id: GroupId) -> Result<Vec<UserId>, LeaderError>;
}
