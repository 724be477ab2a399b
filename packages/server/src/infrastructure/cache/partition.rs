//! Partition list snapshot cache

use std::{sync::Arc, time::Duration};

use crate::domain::{CacheError, EphemeralCache, Partition};

const PARTITION_KEY: &str = "partition";

/// Default lifetime of a partition snapshot
pub const DEFAULT_PARTITION_TTL: Duration = Duration::from_secs(30 * 60);

/// Memoizes the partition list as JSON
pub struct PartitionCache {
    cache: Arc<dyn EphemeralCache>,
    ttl: Duration,
}

impl PartitionCache {
    pub fn new(cache: Arc<dyn EphemeralCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// A corrupt snapshot is logged and reported as a miss.
    pub async fn get(&self) -> Option<Vec<Partition>> {
        let bytes = self.cache.get(PARTITION_KEY).await?;
        match serde_json::from_slice(&bytes) {
            Ok(partitions) => Some(partitions),
            Err(e) => {
                tracing::error!("Failed to deserialize cached partitions: {}", e);
                None
            }
        }
    }

    pub async fn set(&self, partitions: &[Partition]) -> Result<(), CacheError> {
        let bytes =
            serde_json::to_vec(partitions).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.cache.set(PARTITION_KEY, bytes, self.ttl).await
    }

    pub async fn del(&self) {
        self.cache.del(PARTITION_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::InMemoryEphemeralCache;

    fn partitions() -> Vec<Partition> {
        vec![
            Partition {
                id: 1,
                content: "Anime".to_string(),
                parent_id: None,
            },
            Partition {
                id: 2,
                content: "Music".to_string(),
                parent_id: Some(1),
            },
        ]
    }

    #[tokio::test]
    async fn test_set_get_del() {
        // テスト項目: パーティション一覧の保存・取得・削除
        // given (前提条件):
        let store = Arc::new(InMemoryEphemeralCache::new());
        let cache = PartitionCache::new(store, DEFAULT_PARTITION_TTL);

        // when (操作):
        cache.set(&partitions()).await.unwrap();
        let cached = cache.get().await;
        cache.del().await;

        // then (期待する結果):
        assert_eq!(cached, Some(partitions()));
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_miss() {
        // テスト項目: デシリアライズできない値はミス扱い
        // given (前提条件):
        let backing = Arc::new(InMemoryEphemeralCache::new());
        backing
            .set(PARTITION_KEY, b"not json".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        let cache = PartitionCache::new(backing, DEFAULT_PARTITION_TTL);

        // when (操作):
        let cached = cache.get().await;

        // then (期待する結果):
        assert_eq!(cached, None);
    }
}
