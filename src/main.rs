use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod models;
mod router;
mod schema;
mod store;

use crate::config::Config;
use crate::store::{PgStore, Store};

/// Shared application state: the store is built once in `main` and handed to
/// every handler through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,products_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Products Service  — Rust + Axum     ║");
    info!("╚══════════════════════════════════════╝");

    let pool = match bootstrap(&config).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Bootstrap failed, not serving traffic: {:#}", err);
            return Err(err);
        }
    };

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
    };

    let app = router::build_router(state, config.static_dir.as_deref());

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connect and apply the DDL script. Nothing is served unless this succeeds.
async fn bootstrap(config: &Config) -> anyhow::Result<PgPool> {
    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .connect_with(config.connect_options()?)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("Database connection pool established.");

    info!(path = %config.ddl_path.display(), "Initialising schema...");
    let ddl = schema::load_ddl(&config.ddl_path).await?;
    schema::init_schema(&pool, &ddl).await?;

    Ok(pool)
}
