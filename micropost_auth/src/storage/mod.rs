mod cache_store;
mod config;
mod data_store;
mod errors;
mod schema_validation;
mod types;

pub use config::StoreConfig;
pub use errors::StorageError;

pub(crate) use config::{SharedCacheStore, connect_stores};
pub(crate) use types::CacheData;
pub(crate) use data_store::{DB_TABLE_PREFIX, DataStore};
pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
