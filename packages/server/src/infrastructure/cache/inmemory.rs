//! InMemory Ephemeral Cache 実装
//!
//! 期限切れのエントリは次の `get` でミス扱いになるだけで、能動的な掃除はしない。

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use roomcast_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{CacheError, EphemeralCache};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    /// Unix ミリ秒
    expires_at: i64,
}

/// インメモリ TTL キャッシュ
pub struct InMemoryEphemeralCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryEphemeralCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// 時刻源を差し替える（テスト用）
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryEphemeralCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EphemeralCache for InMemoryEphemeralCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let now = self.clock.now_millis();
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl);
        }
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = self.clock.now_millis().saturating_add(ttl_millis);

        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn del(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }
}
