//! micropost-auth - users, microposts, sessions and access control for the
//! micropost sample application
//!
//! The crate is framework-agnostic: web integrations load a [`SessionContext`]
//! per request, evaluate an [`access::Action`] against it and call the
//! coordination functions, which re-check authorization before touching
//! storage.

pub mod access;
mod config;
mod coordination;
mod micropost;
mod session;
mod storage;
mod stores;
mod userdb;
mod utils;
mod validation;

#[cfg(test)]
mod test_utils;

pub use config::{SessionSettings, Settings};
pub use stores::Stores;
pub use storage::{StorageError, StoreConfig};

pub use coordination::{
    CoordinationError, Page, UserProfile, authenticate_user, count_microposts, create_micropost,
    delete_micropost, delete_user_account_admin, find_micropost, find_user, get_user_profile,
    list_users, seed_admin, sign_up, update_user_account, user_microposts,
};

pub use micropost::{Micropost, MicropostError, NewMicropost};
pub use session::{
    Flash, FlashKind, SessionContext, SessionError, SessionManager, SessionUser, SignIn,
};
pub use userdb::{NewUser, User, UserError, UserUpdate};
pub use utils::UtilError;
pub use validation::ValidationErrors;
