use std::sync::Arc;

use crate::micropost::{errors::MicropostError, types::Micropost};
use crate::storage::DataStore;

use super::postgres::*;
use super::sqlite::*;

#[derive(Clone)]
pub(crate) struct MicropostStore {
    data: Arc<dyn DataStore>,
}

impl MicropostStore {
    pub(crate) fn new(data: Arc<dyn DataStore>) -> Self {
        Self { data }
    }

    /// Create the microposts table (after the users table it references).
    pub(crate) async fn init(&self) -> Result<(), MicropostError> {
        match (self.data.as_sqlite(), self.data.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_micropost_tables_sqlite(pool).await
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_micropost_tables_postgres(pool).await
            }
            _ => Err(MicropostError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    #[tracing::instrument(skip(self, content), fields(user_id = %user_id))]
    pub(crate) async fn create(
        &self,
        user_id: i64,
        content: &str,
    ) -> Result<Micropost, MicropostError> {
        let result = if let Some(pool) = self.data.as_sqlite() {
            insert_micropost_sqlite(pool, user_id, content).await
        } else if let Some(pool) = self.data.as_postgres() {
            insert_micropost_postgres(pool, user_id, content).await
        } else {
            Err(MicropostError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        if let Ok(micropost) = &result {
            tracing::info!(micropost_id = micropost.id, "Micropost created");
        }
        result
    }

    #[tracing::instrument(skip(self), fields(micropost_id = %id))]
    pub(crate) async fn get(&self, id: i64) -> Result<Option<Micropost>, MicropostError> {
        if let Some(pool) = self.data.as_sqlite() {
            get_micropost_sqlite(pool, id).await
        } else if let Some(pool) = self.data.as_postgres() {
            get_micropost_postgres(pool, id).await
        } else {
            Err(MicropostError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    #[tracing::instrument(skip(self), fields(micropost_id = %id))]
    pub(crate) async fn delete(&self, id: i64) -> Result<(), MicropostError> {
        let deleted = if let Some(pool) = self.data.as_sqlite() {
            delete_micropost_sqlite(pool, id).await?
        } else if let Some(pool) = self.data.as_postgres() {
            delete_micropost_postgres(pool, id).await?
        } else {
            return Err(MicropostError::Storage(
                "Unsupported database type".to_string(),
            ));
        };

        if deleted {
            tracing::info!("Micropost deleted");
            Ok(())
        } else {
            Err(MicropostError::NotFound)
        }
    }

    /// A user's microposts, newest first.
    pub(crate) async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Micropost>, MicropostError> {
        if let Some(pool) = self.data.as_sqlite() {
            list_microposts_by_user_sqlite(pool, user_id, limit, offset).await
        } else if let Some(pool) = self.data.as_postgres() {
            list_microposts_by_user_postgres(pool, user_id, limit, offset).await
        } else {
            Err(MicropostError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    pub(crate) async fn count_by_user(&self, user_id: i64) -> Result<i64, MicropostError> {
        if let Some(pool) = self.data.as_sqlite() {
            count_microposts_by_user_sqlite(pool, user_id).await
        } else if let Some(pool) = self.data.as_postgres() {
            count_microposts_by_user_postgres(pool, user_id).await
        } else {
            Err(MicropostError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    pub(crate) async fn count(&self) -> Result<i64, MicropostError> {
        if let Some(pool) = self.data.as_sqlite() {
            count_microposts_sqlite(pool).await
        } else if let Some(pool) = self.data.as_postgres() {
            count_microposts_postgres(pool).await
        } else {
            Err(MicropostError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}
