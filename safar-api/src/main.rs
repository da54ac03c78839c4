use std::net::SocketAddr;

use anyhow::Context;
use safar_api::{app, AppState};
use safar_store::app_config::{Backend, Config};
use safar_store::{DbClient, LocalImageStore, Repositories};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safar_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Safar API on port {}", config.server.port);

    let repos = match config.database.backend {
        Backend::Postgres => {
            let db = DbClient::new(&config.database)
                .await
                .context("Failed to connect to Postgres")?;
            Repositories::postgres(db.pool)
        }
        Backend::Memory => {
            tracing::warn!("Using the in-memory backend; data is lost on restart");
            Repositories::in_memory()
        }
    };

    if config.auth.jwt_secret.is_empty() {
        tracing::warn!("auth.jwt_secret is empty; every session will be rejected");
    }

    let images = LocalImageStore::from_config(&config.uploads);
    tokio::fs::create_dir_all(images.dir())
        .await
        .with_context(|| format!("Failed to create upload dir {}", images.dir().display()))?;

    let state = AppState::new(
        repos,
        images,
        config.auth.clone(),
        config.database.backend,
        config.uploads.max_image_mb,
    )
    .context("Failed to register metrics")?
    .with_site_url(config.server.site_url.clone());

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
