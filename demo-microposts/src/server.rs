use axum::Router;
use axum_server::Handle;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// In-flight requests get this long to finish after Ctrl-C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Serve `app` on all interfaces until Ctrl-C.
pub(crate) async fn serve(port: u16, app: Router) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    tracing::info!(%addr, "Sample app listening");
    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    tracing::info!("Sample app stopped");
    Ok(())
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutting down");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

/// Log to stdout. `RUST_LOG` overrides the default filter.
pub(crate) fn init_tracing() {
    let default_filter = if cfg!(debug_assertions) {
        "demo_microposts=debug,micropost_auth=debug,micropost_auth_axum=debug,tower_http=debug,info"
    } else {
        "info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
