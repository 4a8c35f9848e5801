use std::sync::Arc;

use crate::storage::DataStore;
use crate::userdb::{
    errors::UserError,
    types::{NewUserRecord, User, UserSearchField, normalize_email},
};

use super::postgres::*;
use super::sqlite::*;

/// Queries against the users table of whichever backend the data store wraps.
#[derive(Clone)]
pub(crate) struct UserStore {
    data: Arc<dyn DataStore>,
}

impl UserStore {
    pub(crate) fn new(data: Arc<dyn DataStore>) -> Self {
        Self { data }
    }

    /// Create the users table if needed and check its columns.
    pub(crate) async fn init(&self) -> Result<(), UserError> {
        match (self.data.as_sqlite(), self.data.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_user_tables_sqlite(pool).await
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await
            }
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %id))]
    pub(crate) async fn get_user(&self, id: i64) -> Result<Option<User>, UserError> {
        self.get_user_by(UserSearchField::Id(id)).await
    }

    /// Case-insensitive lookup by email.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.get_user_by(UserSearchField::Email(normalize_email(email)))
            .await
    }

    #[tracing::instrument(skip(self), fields(user_field = %field))]
    async fn get_user_by(&self, field: UserSearchField) -> Result<Option<User>, UserError> {
        let result = if let Some(pool) = self.data.as_sqlite() {
            get_user_by_field_sqlite(pool, &field).await
        } else if let Some(pool) = self.data.as_postgres() {
            get_user_by_field_postgres(pool, &field).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(found) => tracing::debug!(found = found.is_some(), "User lookup completed"),
            Err(e) => tracing::error!(error = %e, "User lookup failed"),
        }

        result
    }

    #[tracing::instrument(skip(self, record), fields(email = %record.email, admin = record.admin))]
    pub(crate) async fn create_user(&self, mut record: NewUserRecord) -> Result<User, UserError> {
        record.name = record.name.trim().to_string();
        record.email = normalize_email(&record.email);

        let result = if let Some(pool) = self.data.as_sqlite() {
            insert_user_sqlite(pool, record).await
        } else if let Some(pool) = self.data.as_postgres() {
            insert_user_postgres(pool, record).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(user) => tracing::info!(user_id = user.id, "User created"),
            Err(e) => tracing::warn!(error = %e, "User creation failed"),
        }

        result
    }

    /// Persist name, email and password digest of an existing user.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub(crate) async fn update_user(&self, mut user: User) -> Result<User, UserError> {
        user.name = user.name.trim().to_string();
        user.email = normalize_email(&user.email);

        if let Some(pool) = self.data.as_sqlite() {
            update_user_sqlite(pool, &user).await
        } else if let Some(pool) = self.data.as_postgres() {
            update_user_postgres(pool, &user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Delete a user; their microposts go with them through the foreign key.
    #[tracing::instrument(skip(self), fields(user_id = %id))]
    pub(crate) async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        let deleted = if let Some(pool) = self.data.as_sqlite() {
            delete_user_sqlite(pool, id).await?
        } else if let Some(pool) = self.data.as_postgres() {
            delete_user_postgres(pool, id).await?
        } else {
            return Err(UserError::Storage("Unsupported database type".to_string()));
        };

        if deleted {
            tracing::info!("User deleted");
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    /// One page of users in id order.
    pub(crate) async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, UserError> {
        if let Some(pool) = self.data.as_sqlite() {
            list_users_sqlite(pool, limit, offset).await
        } else if let Some(pool) = self.data.as_postgres() {
            list_users_postgres(pool, limit, offset).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    pub(crate) async fn count_users(&self) -> Result<i64, UserError> {
        if let Some(pool) = self.data.as_sqlite() {
            count_users_sqlite(pool).await
        } else if let Some(pool) = self.data.as_postgres() {
            count_users_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}
