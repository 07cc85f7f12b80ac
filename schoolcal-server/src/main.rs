use anyhow::{Context, Result};
use schoolcal_core::{NeisClient, SchoolCalConfig};
use schoolcal_server::{AppState, CacheGate, app};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SchoolCalConfig::load().context("Failed to load configuration")?;
    let client = NeisClient::new(&config)?;
    let state = AppState::new(CacheGate::new(client, &config));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(
        addr = %config.bind_addr,
        cache_dir = %config.cache_path().display(),
        cache_days = config.cache_days,
        "schoolcal-server listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(e) => {
            warn!(error = %e, "could not listen for ctrl-c, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
