use crate::micropost::{Micropost, NewMicropost};
use crate::session::SessionUser;
use crate::stores::Stores;

use super::errors::CoordinationError;

/// Post as the actor. The owner is always the actor.
#[tracing::instrument(skip(stores, actor, form), fields(actor_id = actor.id))]
pub async fn create_micropost(
    stores: &Stores,
    actor: &SessionUser,
    form: NewMicropost,
) -> Result<Micropost, CoordinationError> {
    if let Err(errors) = form.validate() {
        return Err(CoordinationError::Validation(errors).log());
    }

    let micropost = stores
        .microposts()
        .create(actor.id, form.content.trim())
        .await?;
    Ok(micropost)
}

pub async fn find_micropost(
    stores: &Stores,
    micropost_id: i64,
) -> Result<Micropost, CoordinationError> {
    stores
        .microposts()
        .get(micropost_id)
        .await?
        .ok_or_else(|| CoordinationError::not_found("Micropost", micropost_id).log())
}

/// Delete one of the actor's own microposts.
#[tracing::instrument(skip(stores, actor), fields(actor_id = actor.id))]
pub async fn delete_micropost(
    stores: &Stores,
    actor: &SessionUser,
    micropost_id: i64,
) -> Result<(), CoordinationError> {
    let micropost = find_micropost(stores, micropost_id).await?;
    if micropost.user_id != actor.id {
        tracing::warn!(
            owner_id = micropost.user_id,
            "User attempted to delete another user's micropost"
        );
        return Err(CoordinationError::Unauthorized.log());
    }

    stores.microposts().delete(micropost.id).await?;
    Ok(())
}

/// Total number of microposts across all users.
pub async fn count_microposts(stores: &Stores) -> Result<i64, CoordinationError> {
    Ok(stores.microposts().count().await?)
}
