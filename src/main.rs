//! `Koshub` server binary.

use dotenvy::dotenv;
use koshub::blob::FsBlobStore;
use koshub::config::{self, AppConfig};
use koshub::core::owner::{self, RegisterOwner};
use koshub::entities::User;
use koshub::errors::Result;
use koshub::http::{self, AppState};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Registers the configured bootstrap owner if the user table is empty.
///
/// The generated access token is logged exactly once; there is no other way
/// to obtain a first credential on a fresh database.
async fn bootstrap_owner(db: &DatabaseConnection, config: &AppConfig) -> Result<()> {
    let Some(bootstrap) = &config.bootstrap else {
        return Ok(());
    };

    if User::find().count(db).await? > 0 {
        return Ok(());
    }

    let registered = owner::register_owner(
        db,
        RegisterOwner {
            name: bootstrap.name.clone(),
            address: bootstrap.address.clone(),
            phone: bootstrap.phone.clone(),
            login_email: bootstrap.email.clone(),
        },
    )
    .await?;

    warn!(
        email = %bootstrap.email,
        token = %registered.access_token,
        "bootstrapped first owner account; store this access token now, it will not be shown again"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the main application configuration
    let config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = config::database::create_connection(&config.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 5. Seed the first owner account if configured and needed
    bootstrap_owner(&db, &config).await?;

    // 6. Serve
    let blob = Arc::new(FsBlobStore::new(
        &config.upload_dir,
        config.upload_base_url.clone(),
    ));
    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        db,
        blob,
        config: Arc::new(config),
    };

    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
