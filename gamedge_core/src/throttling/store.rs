//! Timestamp store trait and the in-memory implementation

use crate::Result;
use crate::throttling::CacheKey;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistent map of cache key to last refresh time (epoch milliseconds)
#[async_trait]
pub trait TimestampStore: Send + Sync {
    /// Returns `Ok(None)` if the key was never written
    async fn get(&self, key: &CacheKey) -> Result<Option<u64>>;

    /// Overwrites any previous value for `key`
    async fn put(&self, key: &CacheKey, millis: u64) -> Result<()>;

    /// All stored entries, sorted by key
    async fn entries(&self) -> Result<Vec<(CacheKey, u64)>>;
}

/// Volatile timestamp store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryTimestampStore {
    entries: RwLock<HashMap<CacheKey, u64>>,
}

impl MemoryTimestampStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimestampStore for MemoryTimestampStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<u64>> {
        Ok(self.entries.read().await.get(key).copied())
    }

    async fn put(&self, key: &CacheKey, millis: u64) -> Result<()> {
        self.entries.write().await.insert(key.clone(), millis);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(CacheKey, u64)>> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
