//! people-api - person registry microservice
//!
//! Serves CRUD endpoints for people backed by SQLite. New people are
//! enriched with age, gender and nationality guesses from external
//! name-inference services.

use anyhow::{Context, Result};
use clap::Parser;
use people_common::config::{load_config, ConfigSource};
use people_common::db::init_database;
use people_api::db::SqlitePersonStore;
use people_api::services::{EnrichmentClient, PersonService};
use people_api::{build_router, logging, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(short, long, env = "PEOPLE_LISTEN_ADDR")]
    listen: Option<String>,

    /// sqlx database URL (overrides config)
    #[arg(short, long, env = "PEOPLE_DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    config.validate()?;

    logging::init_logging(config.log_format)?;

    match &source {
        ConfigSource::Defaults => warn!("No config file found, using compiled defaults"),
        source => info!("Loaded config from {}", source),
    }

    info!(
        "Starting people-api v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.listen_addr
    );

    let pool = init_database(&config.database_url, &config.pool_settings())
        .await
        .context("Failed to initialize database")?;
    info!("Database connection established");

    let store = Arc::new(SqlitePersonStore::new(pool, config.storage_timeout()));
    let enricher = Arc::new(
        EnrichmentClient::new(&config.enrichment).context("Failed to build enrichment client")?,
    );
    let state = AppState::new(PersonService::new(store, enricher));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on http://{}", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("people-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
