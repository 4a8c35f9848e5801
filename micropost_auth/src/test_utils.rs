//! Shared fixtures for unit tests

use std::sync::Arc;

use crate::config::Settings;
use crate::storage::{DataStore, StoreConfig, connect_stores};
use crate::stores::Stores;
use crate::userdb::{NewUserRecord, User};

/// A private in-memory SQLite database without tables.
pub(crate) async fn memory_data_store() -> Arc<dyn DataStore> {
    let (data, _cache) = connect_stores(&StoreConfig::in_memory())
        .await
        .expect("Failed to connect in-memory data store");
    data
}

/// Fresh in-memory stores with tables created.
pub(crate) async fn test_stores() -> Stores {
    Stores::connect(&StoreConfig::in_memory(), Settings::for_testing())
        .await
        .expect("Failed to connect test stores")
}

pub(crate) const TEST_PASSWORD: &str = "foobar";

pub(crate) struct TestUsers;

impl TestUsers {
    /// Insert a user whose password is [`TEST_PASSWORD`].
    pub(crate) async fn create(stores: &Stores, email: &str, admin: bool) -> User {
        let digest = bcrypt::hash(TEST_PASSWORD, 4).expect("Failed to hash password");
        stores
            .users()
            .create_user(NewUserRecord {
                name: format!("Test {email}"),
                email: email.to_string(),
                password_digest: digest,
                admin,
            })
            .await
            .expect("Failed to create test user")
    }
}
