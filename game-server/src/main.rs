use anyhow::Context;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use game_server::{
    config::Config, create_routes, game_manager::GameManager, websocket::ConnectionManager,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Hangman Duel server...");

    let config = Config::from_env().context("Invalid server configuration")?;
    let connection_manager = Arc::new(ConnectionManager::new());
    let game_manager = Arc::new(GameManager::new(
        connection_manager.clone(),
        config.room_settings(),
    ));

    let routes = create_routes(connection_manager, game_manager, config.clone());

    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST {:?}", config.host))?;

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown((host, config.port), shutdown_signal())
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
                return;
            }
            _ => warn!("Could not install unix signal handlers, falling back to Ctrl+C"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
