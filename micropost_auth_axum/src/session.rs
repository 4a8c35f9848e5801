use std::convert::Infallible;

use axum::{RequestPartsExt, extract::FromRequestParts};
use axum_extra::{TypedHeader, headers};
use http::request::Parts;
use micropost_auth::{SessionContext, SessionUser, access::AccessRequest};

use crate::state::AppState;

/// The request's session, resolved from the signed session cookie, and the
/// request line the access guards look at.
///
/// Extraction never fails: a missing or invalid cookie is an anonymous
/// session.
///
/// ```no_run
/// use micropost_auth_axum::CurrentSession;
///
/// async fn greet(session: CurrentSession) -> String {
///     match session.current_user() {
///         Some(user) => format!("Hello, {}!", user.name),
///         None => "Hello, stranger!".to_string(),
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CurrentSession {
    pub(crate) context: SessionContext,
    pub(crate) request: AccessRequest,
}

impl CurrentSession {
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.context.current_user()
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parts.extract::<TypedHeader<headers::Cookie>>().await.ok();

        let sessions = state.stores.sessions();
        let cookie_value = cookies
            .as_ref()
            .and_then(|TypedHeader(cookies)| cookies.get(sessions.cookie_name()));
        let context = sessions.load(cookie_value).await;

        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        tracing::debug!(
            signed_in = context.is_signed_in(),
            method = %parts.method,
            path = %path,
            "Session resolved"
        );

        Ok(Self {
            context,
            request: AccessRequest::new(parts.method.clone(), path),
        })
    }
}
