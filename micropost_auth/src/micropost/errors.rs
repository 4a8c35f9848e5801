use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum MicropostError {
    #[error("Micropost not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for MicropostError {
    fn from(err: sqlx::Error) -> Self {
        MicropostError::Storage(err.to_string())
    }
}
