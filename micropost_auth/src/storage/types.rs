use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data stored in the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheData {
    pub(crate) value: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl CacheData {
    pub(crate) fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
