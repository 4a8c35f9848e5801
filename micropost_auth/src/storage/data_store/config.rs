//! Data store connection and table naming

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{env, str::FromStr, sync::LazyLock};

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};
use crate::storage::errors::StorageError;

/// Table prefix from environment variable
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "mp_".to_string()));

/// In-memory SQLite databases live and die with their connection, so the pool
/// must be pinned to a single connection that is never recycled.
fn is_sqlite_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub(crate) async fn connect_data_store(
    store_type: &str,
    store_url: &str,
) -> Result<Box<dyn DataStore>, StorageError> {
    let store: Box<dyn DataStore> = match store_type {
        "sqlite" => {
            let opts = SqliteConnectOptions::from_str(store_url)?.create_if_missing(true);
            let pool_options = if is_sqlite_memory(store_url) {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                SqlitePoolOptions::new()
            };
            Box::new(SqliteDataStore {
                pool: pool_options.connect_with(opts).await?,
            })
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: sqlx::PgPool::connect(store_url).await?,
        }),
        t => {
            return Err(StorageError::Config(format!(
                "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
            )));
        }
    };

    // urls may carry credentials, so only the backend is logged
    tracing::info!(data_store = store.backend(), "Data store ready");

    Ok(store)
}
