//! Turns guard outcomes into redirects.

use axum::response::{IntoResponse, Redirect, Response};
use http::HeaderMap;
use micropost_auth::SessionUser;
use micropost_auth::access::{self, AccessOutcome, Action};

use crate::config::{ROOT_PATH, SIGN_IN_PATH};
use crate::session::CurrentSession;
use crate::state::AppState;

/// A request stopped by the guard chain.
#[derive(Debug)]
pub(crate) enum AccessRejection {
    /// Send to the sign-in page; `headers` may carry a new session cookie
    /// holding the forwarding path.
    SignIn { headers: HeaderMap },
    /// Send home without a message.
    Root,
}

impl IntoResponse for AccessRejection {
    fn into_response(self) -> Response {
        match self {
            AccessRejection::SignIn { headers } => {
                (headers, Redirect::to(SIGN_IN_PATH)).into_response()
            }
            AccessRejection::Root => Redirect::to(ROOT_PATH).into_response(),
        }
    }
}

/// Run the guard chain of `action` for the current request and return the
/// permitted actor.
pub(crate) async fn enforce<'a>(
    state: &AppState,
    session: &'a CurrentSession,
    action: Action,
) -> Result<&'a SessionUser, AccessRejection> {
    let outcome = access::evaluate(session.current_user(), &action, &session.request);
    reject_unless_allowed(state, session, outcome).await?;
    signed_in_actor(session)
}

/// Only the sign-in guard, for actions whose record must be loaded before
/// the rest of the chain can run.
pub(crate) async fn require_sign_in<'a>(
    state: &AppState,
    session: &'a CurrentSession,
) -> Result<&'a SessionUser, AccessRejection> {
    let outcome = access::authenticate(session.current_user(), &session.request);
    reject_unless_allowed(state, session, outcome).await?;
    signed_in_actor(session)
}

// every chain starts with the sign-in guard
fn signed_in_actor(session: &CurrentSession) -> Result<&SessionUser, AccessRejection> {
    session.current_user().ok_or(AccessRejection::SignIn {
        headers: HeaderMap::new(),
    })
}

async fn reject_unless_allowed(
    state: &AppState,
    session: &CurrentSession,
    outcome: AccessOutcome,
) -> Result<(), AccessRejection> {
    match outcome {
        AccessOutcome::Allow => Ok(()),
        AccessOutcome::RedirectToSignIn { forward_to } => {
            tracing::debug!(
                method = %session.request.method,
                path = %session.request.path,
                "Not signed in; redirecting to sign-in"
            );
            let headers = match forward_to {
                Some(path) => state
                    .stores
                    .sessions()
                    .store_location(&session.context, &path)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(error = %e, "Failed to store forwarding location");
                        HeaderMap::new()
                    }),
                None => HeaderMap::new(),
            };
            Err(AccessRejection::SignIn { headers })
        }
        AccessOutcome::RedirectToRoot => {
            tracing::warn!(
                user_id = session.current_user().map(|u| u.id),
                method = %session.request.method,
                path = %session.request.path,
                "Access denied; redirecting to root"
            );
            Err(AccessRejection::Root)
        }
    }
}
