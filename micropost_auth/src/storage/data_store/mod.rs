mod config;
mod types;

pub(crate) use config::{DB_TABLE_PREFIX, connect_data_store};
pub(crate) use types::DataStore;
