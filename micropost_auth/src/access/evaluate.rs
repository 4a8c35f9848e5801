use http::Method;

use crate::session::SessionUser;

use super::types::{AccessOutcome, AccessRequest, Action, Guard};

/// Walk the guard chain of `action` and return the first rejection.
pub fn evaluate(
    actor: Option<&SessionUser>,
    action: &Action,
    request: &AccessRequest,
) -> AccessOutcome {
    for guard in action.guards() {
        let outcome = check(*guard, actor, action, request);
        if !outcome.is_allowed() {
            tracing::debug!(?guard, ?action, ?outcome, "Access rejected");
            return outcome;
        }
    }
    AccessOutcome::Allow
}

/// The sign-in check alone, for actions whose target must be looked up
/// before the full chain can run.
pub fn authenticate(actor: Option<&SessionUser>, request: &AccessRequest) -> AccessOutcome {
    match actor {
        Some(_) => AccessOutcome::Allow,
        None => redirect_to_sign_in(request),
    }
}

fn check(
    guard: Guard,
    actor: Option<&SessionUser>,
    action: &Action,
    request: &AccessRequest,
) -> AccessOutcome {
    let Some(actor) = actor else {
        return redirect_to_sign_in(request);
    };

    let allowed = match guard {
        Guard::SignedIn => true,
        Guard::CorrectUser | Guard::MicropostOwner => action.target_user() == Some(actor.id),
        Guard::Admin => actor.admin,
        Guard::NotSelf => action.target_user() != Some(actor.id),
    };

    if allowed {
        AccessOutcome::Allow
    } else {
        AccessOutcome::RedirectToRoot
    }
}

/// Only GET requests can be replayed by a redirect after sign-in.
fn redirect_to_sign_in(request: &AccessRequest) -> AccessOutcome {
    let forward_to = (request.method == Method::GET).then(|| request.path.clone());
    AccessOutcome::RedirectToSignIn { forward_to }
}
