use crate::micropost::Micropost;
use crate::session::SessionUser;
use crate::stores::Stores;
use crate::userdb::{
    NewUser, NewUserRecord, User, UserError, UserUpdate, hash_password, verify_password,
};
use crate::validation::ValidationErrors;

use super::errors::CoordinationError;
use super::types::{Page, page_window};

const MICROPOSTS_PER_PAGE: i64 = 30;

/// A user's public profile with one page of their microposts.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub microposts: Page<Micropost>,
}

/// Register a new account from the sign-up form.
#[tracing::instrument(skip(stores, form), fields(email = %form.email))]
pub async fn sign_up(stores: &Stores, form: NewUser) -> Result<User, CoordinationError> {
    let mut errors = form.validate().err().unwrap_or_default();
    if errors.is_empty() && email_taken(stores, &form.email, None).await? {
        errors.add("Email has already been taken");
    }
    if !errors.is_empty() {
        return Err(CoordinationError::Validation(errors).log());
    }

    let digest = hash_password(&form.password, stores.settings().bcrypt_cost).await?;
    let user = create_or_conflict(
        stores,
        NewUserRecord {
            name: form.name,
            email: form.email,
            password_digest: digest,
            admin: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User signed up");
    Ok(user)
}

/// Check credentials. Unknown email and wrong password look the same.
#[tracing::instrument(skip(stores, password))]
pub async fn authenticate_user(
    stores: &Stores,
    email: &str,
    password: &str,
) -> Result<User, CoordinationError> {
    let Some(user) = stores.users().get_user_by_email(email).await? else {
        return Err(CoordinationError::InvalidCredentials.log());
    };

    if verify_password(password, &user.password_digest).await {
        Ok(user)
    } else {
        Err(CoordinationError::InvalidCredentials.log())
    }
}

/// Update the actor's own name, email and (if given) password.
#[tracing::instrument(skip(stores, actor, form), fields(actor_id = actor.id))]
pub async fn update_user_account(
    stores: &Stores,
    actor: &SessionUser,
    user_id: i64,
    form: UserUpdate,
) -> Result<User, CoordinationError> {
    if actor.id != user_id {
        tracing::warn!("User attempted to update another user's account");
        return Err(CoordinationError::Unauthorized.log());
    }

    let mut user = find_user(stores, user_id).await?;

    let mut errors = form.validate().err().unwrap_or_default();
    if errors.is_empty() && email_taken(stores, &form.email, Some(user.id)).await? {
        errors.add("Email has already been taken");
    }
    if !errors.is_empty() {
        return Err(CoordinationError::Validation(errors).log());
    }

    if form.changes_password() {
        user.password_digest = hash_password(&form.password, stores.settings().bcrypt_cost).await?;
    }
    user.name = form.name;
    user.email = form.email;

    let updated = match stores.users().update_user(user).await {
        Err(UserError::EmailTaken) => return Err(email_taken_error()),
        other => other?,
    };

    tracing::info!("Profile updated");
    Ok(updated)
}

pub async fn find_user(stores: &Stores, user_id: i64) -> Result<User, CoordinationError> {
    stores
        .users()
        .get_user(user_id)
        .await?
        .ok_or_else(|| CoordinationError::not_found("User", user_id).log())
}

/// Profile page data: the user and a page of their microposts.
pub async fn get_user_profile(
    stores: &Stores,
    user_id: i64,
    page: Option<i64>,
) -> Result<UserProfile, CoordinationError> {
    let user = find_user(stores, user_id).await?;
    let microposts = user_microposts(stores, user.id, page).await?;
    Ok(UserProfile { user, microposts })
}

/// A user's microposts, newest first.
pub async fn user_microposts(
    stores: &Stores,
    user_id: i64,
    page: Option<i64>,
) -> Result<Page<Micropost>, CoordinationError> {
    let store = stores.microposts();
    let total = store.count_by_user(user_id).await?;
    let (page, total_pages, offset) = page_window(page, MICROPOSTS_PER_PAGE, total);
    let items = store
        .list_by_user(user_id, MICROPOSTS_PER_PAGE, offset)
        .await?;

    Ok(Page {
        items,
        page,
        total_pages,
        total,
    })
}

pub(super) async fn create_or_conflict(
    stores: &Stores,
    record: NewUserRecord,
) -> Result<User, CoordinationError> {
    match stores.users().create_user(record).await {
        Err(UserError::EmailTaken) => Err(email_taken_error()),
        other => Ok(other?),
    }
}

/// Whether another account already uses `email` (case-insensitively).
async fn email_taken(
    stores: &Stores,
    email: &str,
    except: Option<i64>,
) -> Result<bool, CoordinationError> {
    let existing = stores.users().get_user_by_email(email).await?;
    Ok(existing.is_some_and(|user| Some(user.id) != except))
}

fn email_taken_error() -> CoordinationError {
    let mut errors = ValidationErrors::new();
    errors.add("Email has already been taken");
    CoordinationError::Validation(errors).log()
}
