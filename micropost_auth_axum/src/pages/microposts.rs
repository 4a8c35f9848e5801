use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Response};
use http::HeaderMap;
use micropost_auth::{
    CoordinationError, Flash, NewMicropost, access::Action, create_micropost, delete_micropost,
    find_micropost,
};
use serde::Deserialize;

use super::redirect_with_flash;
use super::static_pages::home_page;
use crate::access;
use crate::config::ROOT_PATH;
use crate::csrf::{CsrfForm, verify_csrf};
use crate::error::PageError;
use crate::session::CurrentSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct MicropostForm {
    authenticity_token: Option<String>,
    #[serde(flatten)]
    micropost: NewMicropost,
}

pub(super) async fn create(
    State(state): State<AppState>,
    session: CurrentSession,
    headers: HeaderMap,
    form: Result<Form<MicropostForm>, FormRejection>,
) -> Result<Response, PageError> {
    let actor = access::enforce(&state, &session, Action::CreateMicropost).await?;
    let Form(form) = form?;
    verify_csrf(&session, &headers, form.authenticity_token.as_deref())?;

    let draft = form.micropost.content.clone();
    match create_micropost(&state.stores, actor, form.micropost).await {
        Ok(micropost) => {
            tracing::debug!(micropost_id = micropost.id, "Micropost created");
            redirect_with_flash(
                &state,
                &session.context,
                Flash::success("Micropost created!"),
                ROOT_PATH,
            )
            .await
        }
        Err(CoordinationError::Validation(errors)) => {
            let page =
                home_page(&state, &session, None, draft, errors.messages().to_vec()).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn destroy(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(micropost_id): Path<i64>,
    headers: HeaderMap,
    form: Result<Form<CsrfForm>, FormRejection>,
) -> Result<Response, PageError> {
    // visitors are turned away before the record is looked up
    access::require_sign_in(&state, &session).await?;
    let micropost = find_micropost(&state.stores, micropost_id).await?;
    let actor = access::enforce(
        &state,
        &session,
        Action::DestroyMicropost {
            owner_id: micropost.user_id,
        },
    )
    .await?;

    let token = form.ok().and_then(|Form(f)| f.authenticity_token);
    verify_csrf(&session, &headers, token.as_deref())?;

    delete_micropost(&state.stores, actor, micropost.id).await?;
    redirect_with_flash(
        &state,
        &session.context,
        Flash::success("Micropost deleted"),
        ROOT_PATH,
    )
    .await
}
