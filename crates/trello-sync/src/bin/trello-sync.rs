//! Trello sync service binary.
//!
//! Standalone HTTP service exposing inbound and outbound task sync.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trello_sync::{config::Config, server, HttpTaskStore, SyncService, TrelloClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("trello_sync=info".parse()?))
        .init();

    info!("Starting Trello sync service...");

    let config = Config::default();

    if !config.enabled {
        error!("TRELLO_SYNC_ENABLED is false. Sync endpoints will reject requests.");
    }

    let credentials = config.trello_credentials().context(
        "TRELLO_API_KEY, TRELLO_TOKEN and TRELLO_BOARD_ID must all be set",
    )?;
    let trello = TrelloClient::with_base_url(
        credentials.api_key,
        credentials.token,
        credentials.board_id,
        &config.trello_api_url,
        config.request_timeout,
    )
    .context("Failed to create Trello client")?;
    info!(board_id = %trello.board_id(), "Trello API client configured");

    let store = HttpTaskStore::from_config(&config)
        .context("TASK_STORE_URL must be set so created cards can be linked to tasks")?;
    info!(url = %store.base_url(), "Task store client configured");

    let sync = SyncService::new(Arc::new(trello), Arc::new(store), config.status_mapping.clone())
        .with_fetch_concurrency(config.fetch_concurrency);

    // Build application state
    let state = server::AppState {
        config: config.clone(),
        sync,
    };

    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "Trello sync service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Trello sync service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
