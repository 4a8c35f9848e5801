//! The application router

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::pages;
use crate::state::AppState;

/// Create the router serving every page of the application
///
/// Routes:
/// - `/`, `/help`, `/about`, `/contact`
/// - `/signin`, `/sessions`, `/signout`
/// - `/signup`, `/users`, `/users/{id}`, `/users/{id}/edit`, `/users/{id}/delete`
/// - `/microposts`, `/microposts/{id}`, `/microposts/{id}/delete`
///
/// HTML forms cannot send PATCH or DELETE, so the update and destroy actions
/// also answer POST on the paths above.
pub fn microposts_router(state: AppState) -> Router {
    pages::router()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

/// Create the application router without HTTP tracing
///
/// This is the same as `microposts_router()` but without the tracing middleware.
/// Use this if you want to add your own tracing layer.
pub fn microposts_router_no_trace(state: AppState) -> Router {
    pages::router().with_state(state)
}
