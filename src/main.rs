// src/main.rs

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use deckwatch::application::{router, AppState};
use deckwatch::config::CliArgs;
use deckwatch::db::{create_connection_pool, get_connection, initialize_database, verify_database_integrity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `log` records from the library are bridged into this subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 1. CONFIGURATION
    let args = CliArgs::parse();
    let config = args
        .to_tracker_config()
        .context("Invalid configuration")?;

    // 2. INFRASTRUCTURE
    let pool = create_connection_pool(&config.database_path).with_context(|| {
        format!("Cannot open database {}", config.database_path.display())
    })?;
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }

    // 3. HTTP
    let bind_addr = config.bind_addr;
    log::info!(
        "Tailing {} with {} ms polls",
        config.log_path.display(),
        config.poll_interval_ms
    );
    let app = router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Cannot bind {}", bind_addr))?;
    log::info!("Deckwatch listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
