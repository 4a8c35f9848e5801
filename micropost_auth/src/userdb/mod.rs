mod errors;
mod password;
mod storage;
mod types;

pub use errors::UserError;
pub use types::{NewUser, User, UserUpdate};

pub(crate) use password::{hash_password, verify_password};
pub(crate) use storage::{DB_TABLE_USERS, UserStore};
pub(crate) use types::NewUserRecord;
