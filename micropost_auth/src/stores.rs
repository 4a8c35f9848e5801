use std::sync::Arc;

use crate::config::Settings;
use crate::coordination::CoordinationError;
use crate::micropost::MicropostStore;
use crate::session::SessionManager;
use crate::storage::{DataStore, SharedCacheStore, StoreConfig, connect_stores};
use crate::userdb::UserStore;

/// Connected data and cache stores plus settings. Cloning is cheap; every
/// clone shares the same pools.
#[derive(Clone)]
pub struct Stores {
    data: Arc<dyn DataStore>,
    cache: SharedCacheStore,
    settings: Arc<Settings>,
}

impl Stores {
    /// Connect both stores and create the tables.
    pub async fn connect(config: &StoreConfig, settings: Settings) -> Result<Self, CoordinationError> {
        let (data, cache) = connect_stores(config).await?;
        let stores = Self {
            data,
            cache,
            settings: Arc::new(settings),
        };

        // users first; microposts reference them
        stores.users().init().await?;
        stores.microposts().init().await?;

        Ok(stores)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(
            self.cache.clone(),
            self.users(),
            self.settings.session.clone(),
        )
    }

    pub(crate) fn users(&self) -> UserStore {
        UserStore::new(self.data.clone())
    }

    pub(crate) fn microposts(&self) -> MicropostStore {
        MicropostStore::new(self.data.clone())
    }
}
