use askama::Template;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use micropost_auth::{CoordinationError, authenticate_user};
use serde::Deserialize;

use super::layout::Layout;
use super::{render, user_path};
use crate::config::ROOT_PATH;
use crate::error::{IntoResponseError, PageError};
use crate::session::CurrentSession;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "signin.html")]
struct SignInTemplate {
    layout: Layout,
    email: String,
    invalid_credentials: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SignInForm {
    email: String,
    password: String,
}

pub(super) async fn new(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Html<String>, PageError> {
    sign_in_page(&state, &session, String::new(), false).await
}

pub(super) async fn create(
    State(state): State<AppState>,
    session: CurrentSession,
    Form(form): Form<SignInForm>,
) -> Result<Response, PageError> {
    let user = match authenticate_user(&state.stores, &form.email, &form.password).await {
        Ok(user) => user,
        Err(CoordinationError::InvalidCredentials) => {
            // the banner lives only in this response, never in the session
            let page = sign_in_page(&state, &session, form.email, true).await?;
            return Ok(page.into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let signed_in = state
        .stores
        .sessions()
        .sign_in(&session.context, &user)
        .await
        .into_response_error()?;

    let target = signed_in
        .return_to
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| user_path(user.id));
    tracing::debug!(user_id = user.id, target = %target, "Redirecting after sign-in");

    Ok((signed_in.headers, Redirect::to(&target)).into_response())
}

pub(super) async fn destroy(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Response, PageError> {
    let headers = state
        .stores
        .sessions()
        .sign_out(&session.context)
        .await
        .into_response_error()?;
    Ok((headers, Redirect::to(ROOT_PATH)).into_response())
}

async fn sign_in_page(
    state: &AppState,
    session: &CurrentSession,
    email: String,
    invalid_credentials: bool,
) -> Result<Html<String>, PageError> {
    let layout = Layout::new(state, session, Some("Sign In")).await?;
    render(&SignInTemplate {
        layout,
        email,
        invalid_credentials,
    })
}

/// Forwarding targets must stay on this site.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
