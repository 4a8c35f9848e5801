use chrono::{DateTime, Utc};
use micropost_auth::{Flash, Micropost, Page, SessionUser, User};

use crate::config::{APP_TITLE, full_title};
use crate::error::{IntoResponseError, PageError};
use crate::session::CurrentSession;
use crate::state::AppState;

/// Everything `base.html` needs: title, navigation state, CSRF meta tag and
/// pending flash messages.
pub(crate) struct Layout {
    pub(crate) full_title: String,
    pub(crate) current_user: Option<SessionUser>,
    pub(crate) csrf_token: Option<String>,
    pub(crate) flash: Vec<Flash>,
}

impl Layout {
    /// Build the layout for a rendered page. Pending flash messages are
    /// consumed here.
    pub(crate) async fn new(
        state: &AppState,
        session: &CurrentSession,
        title: Option<&str>,
    ) -> Result<Self, PageError> {
        let flash = state
            .stores
            .sessions()
            .take_flash(&session.context)
            .await
            .into_response_error()?;

        Ok(Self {
            full_title: full_title(APP_TITLE.as_str(), title),
            current_user: session.current_user().cloned(),
            csrf_token: session.context.csrf_token().map(str::to_string),
            flash,
        })
    }

    /// Token for hidden form fields; empty without a session.
    pub(crate) fn csrf_token_value(&self) -> &str {
        self.csrf_token.as_deref().unwrap_or_default()
    }
}

/// Previous/next links for a paginated listing at `path`.
pub(crate) struct Pagination {
    pub(crate) path: String,
    pub(crate) page: i64,
    pub(crate) total_pages: i64,
    pub(crate) total: i64,
}

impl Pagination {
    pub(crate) fn new<T>(path: impl Into<String>, page: &Page<T>) -> Self {
        Self {
            path: path.into(),
            page: page.page,
            total_pages: page.total_pages,
            total: page.total,
        }
    }

    pub(crate) fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            page: 1,
            total_pages: 1,
            total: 0,
        }
    }

    pub(crate) fn previous_page(&self) -> Option<i64> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub(crate) fn next_page(&self) -> Option<i64> {
        (self.page < self.total_pages).then(|| self.page + 1)
    }
}

/// A micropost as listed on the home feed and profile pages.
pub(crate) struct MicropostView {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) posted_ago: String,
    /// The viewer owns it and may delete it
    pub(crate) deletable: bool,
}

impl MicropostView {
    pub(crate) fn new(micropost: Micropost, viewer: Option<&SessionUser>) -> Self {
        let deletable = viewer.is_some_and(|u| u.id == micropost.user_id);
        Self {
            id: micropost.id,
            posted_ago: time_ago_in_words(micropost.created_at, Utc::now()),
            content: micropost.content,
            deletable,
        }
    }
}

/// A user as listed on the users index.
pub(crate) struct UserRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) gravatar_url: String,
    /// The viewer is an admin and this is someone else
    pub(crate) deletable: bool,
}

impl UserRow {
    pub(crate) fn new(user: &User, viewer: Option<&SessionUser>) -> Self {
        let deletable = viewer.is_some_and(|v| v.admin && v.id != user.id);
        Self {
            id: user.id,
            name: user.name.clone(),
            gravatar_url: user.gravatar_url(50),
            deletable,
        }
    }
}

/// Rough English distance such as "less than a minute" or "3 days".
pub(crate) fn time_ago_in_words(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    fn plural(n: i64, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    }

    if minutes < 1 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes, "minute")
    } else if hours < 24 {
        format!("about {}", plural(hours.max(1), "hour"))
    } else if days < 30 {
        plural(days, "day")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        format!("about {}", plural(days / 365, "year"))
    }
}
