//! Store selection, read from the environment or built directly by callers

use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::cache_store::{CacheStore, InMemoryCacheStore, RedisCacheStore};
use super::data_store::{DataStore, connect_data_store};
use super::errors::StorageError;

pub(crate) type SharedCacheStore = Arc<Mutex<Box<dyn CacheStore>>>;

/// Which backends to use for persistent data and for session cache entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `sqlite` or `postgres`
    pub data_store_type: String,
    pub data_store_url: String,
    /// `memory` or `redis`
    pub cache_store_type: String,
    pub cache_store_url: String,
}

impl StoreConfig {
    /// Read `GENERIC_DATA_STORE_TYPE`, `GENERIC_DATA_STORE_URL`,
    /// `GENERIC_CACHE_STORE_TYPE` and `GENERIC_CACHE_STORE_URL`.
    pub fn from_env() -> Result<Self, StorageError> {
        fn required(key: &str) -> Result<String, StorageError> {
            env::var(key).map_err(|_| StorageError::Config(format!("{key} must be set")))
        }

        Ok(Self {
            data_store_type: required("GENERIC_DATA_STORE_TYPE")?,
            data_store_url: required("GENERIC_DATA_STORE_URL")?,
            cache_store_type: required("GENERIC_CACHE_STORE_TYPE")?,
            cache_store_url: required("GENERIC_CACHE_STORE_URL")?,
        })
    }

    /// Private in-memory SQLite database with an in-memory cache.
    pub fn in_memory() -> Self {
        Self {
            data_store_type: "sqlite".to_string(),
            data_store_url: "sqlite::memory:".to_string(),
            cache_store_type: "memory".to_string(),
            cache_store_url: "memory".to_string(),
        }
    }
}

pub(crate) async fn connect_stores(
    config: &StoreConfig,
) -> Result<(Arc<dyn DataStore>, SharedCacheStore), StorageError> {
    let data: Arc<dyn DataStore> =
        Arc::from(connect_data_store(&config.data_store_type, &config.data_store_url).await?);
    let cache = connect_cache_store(&config.cache_store_type, &config.cache_store_url).await?;
    Ok((data, Arc::new(Mutex::new(cache))))
}

async fn connect_cache_store(
    store_type: &str,
    store_url: &str,
) -> Result<Box<dyn CacheStore>, StorageError> {
    let store: Box<dyn CacheStore> = match store_type {
        "memory" => Box::new(InMemoryCacheStore::new()),
        "redis" => Box::new(RedisCacheStore::open(store_url)?),
        t => {
            return Err(StorageError::Config(format!(
                "Unsupported cache store type: {t}. Supported types are 'memory' and 'redis'"
            )));
        }
    };

    store.ping().await?;
    tracing::info!(cache_store = store_type, "Cache store ready");

    Ok(store)
}
