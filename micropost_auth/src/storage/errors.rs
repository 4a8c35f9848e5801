use thiserror::Error;

/// Failures talking to the data or cache backend.
///
/// Driver errors are flattened to strings so the type stays `Clone`.
#[derive(Debug, Error, Clone)]
pub enum StorageError {
    /// The database or redis server refused or failed the operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// A cached record could not be encoded or decoded
    #[error("Cache encoding error: {0}")]
    Encoding(String),

    /// Unknown store type or missing setting
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}
