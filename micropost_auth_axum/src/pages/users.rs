use askama::Template;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use http::HeaderMap;
use micropost_auth::{
    CoordinationError, Flash, NewUser, UserUpdate, access::Action, delete_user_account_admin,
    find_user, get_user_profile, list_users, sign_up, update_user_account,
};
use serde::Deserialize;

use super::layout::{Layout, MicropostView, Pagination, UserRow};
use super::{PageQuery, redirect_with_flash, render, user_path};
use crate::access;
use crate::config::ROOT_PATH;
use crate::csrf::{CsrfForm, verify_csrf};
use crate::error::{IntoResponseError, PageError};
use crate::session::CurrentSession;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "users_index.html")]
struct UsersIndexTemplate {
    layout: Layout,
    users: Vec<UserRow>,
    pagination: Pagination,
}

#[derive(Template)]
#[template(path = "user_show.html")]
struct UserShowTemplate {
    layout: Layout,
    name: String,
    gravatar_url: String,
    microposts: Vec<MicropostView>,
    pagination: Pagination,
}

#[derive(Template)]
#[template(path = "signup.html")]
struct SignUpTemplate {
    layout: Layout,
    name: String,
    email: String,
    errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "user_edit.html")]
struct UserEditTemplate {
    layout: Layout,
    user_id: i64,
    name: String,
    email: String,
    gravatar_url: String,
    errors: Vec<String>,
}

/// The edit form: profile fields plus the CSRF token.
#[derive(Debug, Deserialize)]
pub(super) struct UserUpdateForm {
    authenticity_token: Option<String>,
    #[serde(flatten)]
    user: UserUpdate,
}

pub(super) async fn index(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let actor = access::enforce(&state, &session, Action::ListUsers).await?;

    let page = list_users(&state.stores, actor, query.page).await?;
    let users = page
        .items
        .iter()
        .map(|user| UserRow::new(user, Some(actor)))
        .collect();

    let layout = Layout::new(&state, &session, Some("All users")).await?;
    render(&UsersIndexTemplate {
        layout,
        users,
        pagination: Pagination::new("/users", &page),
    })
}

pub(super) async fn show(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let profile = get_user_profile(&state.stores, user_id, query.page).await?;

    let pagination = Pagination::new(user_path(user_id), &profile.microposts);
    let microposts = profile
        .microposts
        .items
        .into_iter()
        .map(|m| MicropostView::new(m, session.current_user()))
        .collect();

    let layout = Layout::new(&state, &session, Some(profile.user.name.as_str())).await?;
    render(&UserShowTemplate {
        layout,
        gravatar_url: profile.user.gravatar_url(80),
        name: profile.user.name,
        microposts,
        pagination,
    })
}

pub(super) async fn new(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Response, PageError> {
    if session.context.is_signed_in() {
        return Ok(Redirect::to(ROOT_PATH).into_response());
    }
    let page = sign_up_page(&state, &session, NewUser::default(), Vec::new()).await?;
    Ok(page.into_response())
}

pub(super) async fn create(
    State(state): State<AppState>,
    session: CurrentSession,
    Form(form): Form<NewUser>,
) -> Result<Response, PageError> {
    let user = match sign_up(&state.stores, form.clone()).await {
        Ok(user) => user,
        Err(CoordinationError::Validation(errors)) => {
            let page = sign_up_page(&state, &session, form, errors.messages().to_vec()).await?;
            return Ok(page.into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let sessions = state.stores.sessions();
    let signed_in = sessions
        .sign_in(&session.context, &user)
        .await
        .into_response_error()?;
    let mut headers = signed_in.headers;
    headers.extend(
        sessions
            .push_flash(
                &signed_in.context,
                Flash::success("Welcome to the Sample App!"),
            )
            .await
            .into_response_error()?,
    );

    Ok((headers, Redirect::to(&user_path(user.id))).into_response())
}

pub(super) async fn edit(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(user_id): Path<i64>,
) -> Result<Html<String>, PageError> {
    access::enforce(&state, &session, Action::EditUser(user_id)).await?;

    let user = find_user(&state.stores, user_id).await?;
    let layout = Layout::new(&state, &session, Some("Edit user")).await?;
    render(&UserEditTemplate {
        layout,
        user_id: user.id,
        gravatar_url: user.gravatar_url(80),
        name: user.name,
        email: user.email,
        errors: Vec::new(),
    })
}

pub(super) async fn update(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    form: Result<Form<UserUpdateForm>, FormRejection>,
) -> Result<Response, PageError> {
    let actor = access::enforce(&state, &session, Action::UpdateUser(user_id)).await?;
    let Form(form) = form?;
    verify_csrf(&session, &headers, form.authenticity_token.as_deref())?;

    let submitted = form.user.clone();
    match update_user_account(&state.stores, actor, user_id, form.user).await {
        Ok(user) => {
            redirect_with_flash(
                &state,
                &session.context,
                Flash::success("Profile updated"),
                &user_path(user.id),
            )
            .await
        }
        Err(CoordinationError::Validation(errors)) => {
            let user = find_user(&state.stores, user_id).await?;
            let layout = Layout::new(&state, &session, Some("Edit user")).await?;
            let page = render(&UserEditTemplate {
                layout,
                user_id,
                gravatar_url: user.gravatar_url(80),
                name: submitted.name,
                email: submitted.email,
                errors: errors.messages().to_vec(),
            })?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub(super) async fn destroy(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    form: Result<Form<CsrfForm>, FormRejection>,
) -> Result<Response, PageError> {
    let actor = access::enforce(&state, &session, Action::DestroyUser(user_id)).await?;
    // a bodiless DELETE carries its token in the header
    let token = form.ok().and_then(|Form(f)| f.authenticity_token);
    verify_csrf(&session, &headers, token.as_deref())?;

    delete_user_account_admin(&state.stores, actor, user_id).await?;
    redirect_with_flash(
        &state,
        &session.context,
        Flash::success("User deleted."),
        "/users",
    )
    .await
}

async fn sign_up_page(
    state: &AppState,
    session: &CurrentSession,
    form: NewUser,
    errors: Vec<String>,
) -> Result<Html<String>, PageError> {
    let layout = Layout::new(state, session, Some("Sign up")).await?;
    render(&SignUpTemplate {
        layout,
        name: form.name,
        email: form.email,
        errors,
    })
}
