//! HTML pages and the routes that serve them.

mod assets;
mod layout;
mod microposts;
mod sessions;
mod static_pages;
mod users;

use askama::Template;
use axum::{
    Router,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use micropost_auth::{Flash, SessionContext};
use serde::Deserialize;

use crate::error::{IntoResponseError, PageError};
use crate::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(static_pages::home))
        .route("/help", get(static_pages::help))
        .route("/about", get(static_pages::about))
        .route("/contact", get(static_pages::contact))
        .route("/signin", get(sessions::new))
        .route("/sessions", post(sessions::create))
        .route("/signout", get(sessions::destroy).delete(sessions::destroy))
        .route("/signup", get(users::new))
        .route("/users", get(users::index).post(users::create))
        .route(
            "/users/{id}",
            get(users::show)
                .patch(users::update)
                .post(users::update)
                .delete(users::destroy),
        )
        .route("/users/{id}/edit", get(users::edit))
        .route("/users/{id}/delete", post(users::destroy))
        .route("/microposts", post(microposts::create))
        .route("/microposts/{id}", delete(microposts::destroy))
        .route("/microposts/{id}/delete", post(microposts::destroy))
        .route("/assets/app.css", get(assets::serve_app_css))
}

/// `?page=N` on paginated listings.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<i64>,
}

fn render<T: Template>(template: &T) -> Result<Html<String>, PageError> {
    Ok(Html(template.render().into_response_error()?))
}

/// Queue `flash` for the next page and redirect to `to`.
async fn redirect_with_flash(
    state: &AppState,
    context: &SessionContext,
    flash: Flash,
    to: &str,
) -> Result<Response, PageError> {
    let headers = state
        .stores
        .sessions()
        .push_flash(context, flash)
        .await
        .into_response_error()?;
    Ok((headers, Redirect::to(to)).into_response())
}

fn user_path(user_id: i64) -> String {
    format!("/users/{user_id}")
}
