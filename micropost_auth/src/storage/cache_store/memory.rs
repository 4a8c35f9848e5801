use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, InMemoryCacheStore, cache_key};

impl InMemoryCacheStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Using in-memory cache store; sessions end with the process");
        Self {
            entries: HashMap::new(),
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        _ttl_secs: u64,
    ) -> Result<(), StorageError> {
        // sweep on write; nothing else evicts
        self.entries.retain(|_, v| !v.is_expired());
        self.entries.insert(cache_key(prefix, key), value);
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        Ok(self
            .entries
            .get(&cache_key(prefix, key))
            .filter(|data| !data.is_expired())
            .cloned())
    }

    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        Ok(self
            .entries
            .remove(&cache_key(prefix, key))
            .filter(|data| !data.is_expired()))
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        self.entries.remove(&cache_key(prefix, key));
        Ok(())
    }
}
