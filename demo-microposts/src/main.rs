mod server;

use micropost_auth_axum::{AppState, Settings, StoreConfig, Stores, microposts_router, seed_admin};
use server::{init_tracing, serve};

const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let stores = Stores::connect(&StoreConfig::from_env()?, Settings::from_env()).await?;
    seed_admin_from_env(&stores).await?;

    let port = match std::env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => DEFAULT_PORT,
    };

    let app = microposts_router(AppState::new(stores));
    serve(port, app).await?;
    Ok(())
}

/// Create the admin named by `SEED_ADMIN_*` unless it already exists.
async fn seed_admin_from_env(stores: &Stores) -> Result<(), Box<dyn std::error::Error>> {
    let (Ok(email), Ok(password)) = (
        std::env::var("SEED_ADMIN_EMAIL"),
        std::env::var("SEED_ADMIN_PASSWORD"),
    ) else {
        tracing::debug!("SEED_ADMIN_EMAIL/SEED_ADMIN_PASSWORD not set; no admin seeded");
        return Ok(());
    };
    let name = std::env::var("SEED_ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string());

    let admin = seed_admin(stores, &name, &email, &password).await?;
    tracing::info!(user_id = admin.id, "Admin account ready");
    Ok(())
}
