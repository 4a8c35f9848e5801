//! micropost-auth-axum - axum pages for the micropost sample application
//!
//! Every request resolves a [`CurrentSession`] from the signed session cookie.
//! Protected handlers run the access guard chain for their action before
//! touching the request body, then check the CSRF token on state-changing
//! requests.
//!
//! ```no_run
//! use micropost_auth_axum::{AppState, Settings, StoreConfig, Stores, microposts_router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let stores = Stores::connect(&StoreConfig::from_env()?, Settings::from_env()).await?;
//! let app = microposts_router(AppState::new(stores));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod access;
mod config;
mod csrf;
mod error;
mod pages;
mod router;
mod session;
mod state;

pub use config::APP_TITLE;
pub use error::IntoResponseError;
pub use router::{microposts_router, microposts_router_no_trace};
pub use session::CurrentSession;
pub use state::AppState;

// Re-export what an application needs to build its state
pub use micropost_auth::{Settings, StoreConfig, Stores, seed_admin};
