use http::HeaderMap;
use serde::Deserialize;

use crate::error::PageError;
use crate::session::CurrentSession;

pub(crate) const CSRF_HEADER: &str = "x-csrf-token";

/// Body of forms that carry nothing but the token, such as delete buttons.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CsrfForm {
    pub(crate) authenticity_token: Option<String>,
}

/// Check the session CSRF token against the `X-CSRF-Token` header, falling
/// back to the `authenticity_token` form field.
pub(crate) fn verify_csrf(
    session: &CurrentSession,
    headers: &HeaderMap,
    form_token: Option<&str>,
) -> Result<(), PageError> {
    let submitted = headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .or(form_token)
        .unwrap_or_default();

    if session.context.verify_csrf(submitted) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = session.current_user().map(|u| u.id),
            path = %session.request.path,
            has_token = !submitted.is_empty(),
            "CSRF token mismatch"
        );
        Err(PageError::forbidden("Invalid authenticity token"))
    }
}
