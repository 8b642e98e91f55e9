use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::auth::AuthKeys;
use crate::config::config;
use crate::database::{DatabaseManager, PgDatabase};
use crate::images::CloudinaryClient;
use crate::routes;
use crate::state::AppState;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let config = config();
    info!("Starting Golf Classic API in {:?} mode", config.environment);

    let database_url = DatabaseManager::database_url()?;
    let pool = DatabaseManager::connect(&database_url, &config.database).await?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let auth = AuthKeys::new(config.security.jwt_secret.clone());
    if !auth.is_configured() {
        if crate::is_production!() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        warn!("JWT_SECRET is not set; every write will answer 401");
    }

    let images = CloudinaryClient::from_config(&config.images).context("failed to build image host client")?;
    if !images.is_configured() {
        warn!("Cloudinary credentials missing; uploads will answer 502");
    }

    let state = AppState::new(
        Arc::new(PgDatabase::new(pool, &config.database)),
        Arc::new(images),
        auth,
    );
    let app = routes::app(state, config);

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.api.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Golf Classic API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
