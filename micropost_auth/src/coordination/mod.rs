//! Use-case functions. Each one re-checks its own authorization so storage
//! is never mutated on behalf of someone who may not do so.

mod admin;
mod errors;
mod micropost;
mod types;
mod user;

pub use admin::{delete_user_account_admin, list_users, seed_admin};
pub use errors::CoordinationError;
pub use micropost::{count_microposts, create_micropost, delete_micropost, find_micropost};
pub use types::Page;
pub use user::{
    UserProfile, authenticate_user, find_user, get_user_profile, sign_up, update_user_account,
    user_microposts,
};
