use async_trait::async_trait;
use dashmap::DashMap;

use crate::dispatch::{GroupId, UserId};

use super::{LeaderError, LeaderResolver};

/// In-memory leader assignments
#[derive(Default)]
pub struct MemoryLeaderResolver {
    leaders: DashMap<GroupId, Vec<UserId>>,
}

impl MemoryLeaderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_leaders(&self, group_id: GroupId, leaders: Vec<UserId>) {
        self.leaders.insert(group_id, leaders);
    }

    pub fn with_leaders(self, group_id: GroupId, leaders: Vec<UserId>) -> Self {
        self.set_leaders(group_id, leaders);
        self
    }
}

#[async_trait]
impl LeaderResolver for MemoryLeaderResolver {
    async fn get_leaders(&self, group_id: GroupId) -> Result<Vec<UserId>, LeaderError> {
        Ok(self
            .leaders
            .get(&group_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_and_unknown_groups() {
        let resolver =
            MemoryLeaderResolver::new().with_leaders(GroupId(4), vec![UserId(10), UserId(11)]);

        assert_eq!(
            resolver.get_leaders(GroupId(4)).await.unwrap(),
            vec![UserId(10), UserId(11)]
        );
        assert!(resolver.get_leaders(GroupId(5)).await.unwrap().is_empty());
    }
}
