use async_trait::async_trait;
use redis::AsyncCommands;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, RedisCacheStore, cache_key};

impl RedisCacheStore {
    pub(crate) fn open(url: &str) -> Result<Self, StorageError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

fn decode_live(raw: Option<String>) -> Result<Option<CacheData>, StorageError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let data: CacheData = serde_json::from_str(&raw)?;
    Ok((!data.is_expired()).then_some(data))
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn put(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl_secs: u64,
    ) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let value = serde_json::to_string(&value)?;
        // redis rejects a zero expiry
        let _: () = conn
            .set_ex(cache_key(prefix, key), value, ttl_secs.max(1))
            .await?;
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(cache_key(prefix, key)).await?;
        decode_live(raw)
    }

    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get_del(cache_key(prefix, key)).await?;
        decode_live(raw)
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(cache_key(prefix, key)).await?;
        Ok(())
    }
}
