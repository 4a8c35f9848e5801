use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

/// Process-local store; sessions are lost on restart.
pub(crate) struct InMemoryCacheStore {
    pub(super) entries: HashMap<String, CacheData>,
}

pub(crate) struct RedisCacheStore {
    pub(super) client: redis::Client,
}

/// Short-lived records such as sessions, namespaced by `prefix`.
///
/// Every [`CacheData`] carries its own expiry and expired entries read as
/// absent whether or not the backend has evicted them yet.
#[async_trait]
pub(crate) trait CacheStore: Send + Sync + 'static {
    /// Fail early when the backend is unreachable.
    async fn ping(&self) -> Result<(), StorageError>;

    async fn put(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl_secs: u64,
    ) -> Result<(), StorageError>;

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove the entry and return it if it was still live.
    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError>;
}

pub(super) fn cache_key(prefix: &str, key: &str) -> String {
    format!("cache:{prefix}:{key}")
}
