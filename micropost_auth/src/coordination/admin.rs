use crate::session::SessionUser;
use crate::stores::Stores;
use crate::userdb::{NewUserRecord, User, hash_password};

use super::errors::CoordinationError;
use super::types::{Page, page_window};
use super::user::{create_or_conflict, find_user};

/// One page of all users, for any signed-in user.
pub async fn list_users(
    stores: &Stores,
    _actor: &SessionUser,
    page: Option<i64>,
) -> Result<Page<User>, CoordinationError> {
    let users = stores.users();
    let total = users.count_users().await?;
    let (page, total_pages, offset) =
        page_window(page, stores.settings().users_per_page, total);
    let items = users
        .list_users(stores.settings().users_per_page, offset)
        .await?;

    Ok(Page {
        items,
        page,
        total_pages,
        total,
    })
}

/// Delete another user's account. Admins only, and never their own.
#[tracing::instrument(skip(stores, actor), fields(actor_id = actor.id))]
pub async fn delete_user_account_admin(
    stores: &Stores,
    actor: &SessionUser,
    user_id: i64,
) -> Result<(), CoordinationError> {
    if !actor.admin {
        tracing::warn!("Non-admin user attempted to delete a user");
        return Err(CoordinationError::Unauthorized.log());
    }
    if actor.id == user_id {
        tracing::warn!("Admin attempted to delete their own account");
        return Err(CoordinationError::Unauthorized.log());
    }

    let user = find_user(stores, user_id).await?;
    stores.users().delete_user(user.id).await?;

    tracing::info!(deleted_email = %user.email, "User deleted by admin");
    Ok(())
}

/// Ensure an admin account with `email` exists. An existing account is
/// returned untouched.
#[tracing::instrument(skip(stores, password))]
pub async fn seed_admin(
    stores: &Stores,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, CoordinationError> {
    if let Some(existing) = stores.users().get_user_by_email(email).await? {
        tracing::info!(user_id = existing.id, "Seed admin already exists");
        return Ok(existing);
    }

    let digest = hash_password(password, stores.settings().bcrypt_cost).await?;
    let user = create_or_conflict(
        stores,
        NewUserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password_digest: digest,
            admin: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Seed admin created");
    Ok(user)
}
