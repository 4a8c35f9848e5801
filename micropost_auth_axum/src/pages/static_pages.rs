use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use micropost_auth::get_user_profile;

use super::layout::{Layout, MicropostView, Pagination};
use super::{PageQuery, render};
use crate::config::ROOT_PATH;
use crate::error::PageError;
use crate::session::CurrentSession;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    layout: Layout,
    gravatar_url: String,
    /// Draft kept after a rejected post
    content: String,
    errors: Vec<String>,
    microposts: Vec<MicropostView>,
    pagination: Pagination,
}

#[derive(Template)]
#[template(path = "static_page.html")]
struct StaticPageTemplate {
    layout: Layout,
    heading: &'static str,
    body: &'static str,
}

pub(super) async fn home(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    home_page(&state, &session, query.page, String::new(), Vec::new()).await
}

/// The home page: a welcome for visitors, the micropost form and feed for
/// signed-in users.
pub(super) async fn home_page(
    state: &AppState,
    session: &CurrentSession,
    page: Option<i64>,
    content: String,
    errors: Vec<String>,
) -> Result<Html<String>, PageError> {
    let layout = Layout::new(state, session, None).await?;

    let (gravatar_url, microposts, pagination) = match session.current_user() {
        Some(user) => {
            let profile = get_user_profile(&state.stores, user.id, page).await?;
            let pagination = Pagination::new(ROOT_PATH, &profile.microposts);
            let microposts = profile
                .microposts
                .items
                .into_iter()
                .map(|m| MicropostView::new(m, Some(user)))
                .collect();
            (profile.user.gravatar_url(50), microposts, pagination)
        }
        None => (String::new(), Vec::new(), Pagination::empty(ROOT_PATH)),
    };

    render(&HomeTemplate {
        layout,
        gravatar_url,
        content,
        errors,
        microposts,
        pagination,
    })
}

pub(super) async fn help(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Html<String>, PageError> {
    static_page(
        &state,
        &session,
        "Help",
        "Get help on the micropost sample application from the project documentation.",
    )
    .await
}

pub(super) async fn about(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Html<String>, PageError> {
    static_page(
        &state,
        &session,
        "About",
        "A small social application: sign up, post short messages and browse other users.",
    )
    .await
}

pub(super) async fn contact(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Html<String>, PageError> {
    static_page(
        &state,
        &session,
        "Contact",
        "Contact the maintainers through the project's issue tracker.",
    )
    .await
}

async fn static_page(
    state: &AppState,
    session: &CurrentSession,
    heading: &'static str,
    body: &'static str,
) -> Result<Html<String>, PageError> {
    let layout = Layout::new(state, session, Some(heading)).await?;
    render(&StaticPageTemplate {
        layout,
        heading,
        body,
    })
}
