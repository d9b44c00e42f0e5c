mod api_error;
mod config;
mod handlers;
mod pending_streams;
mod router;
mod service_factory;
mod state;

use config::{Config, ConfigError};
use state::AppState;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Waits for Ctrl+C or SIGTERM, whichever comes first (unix only installs
/// the latter), the same dual-signal pattern `onecompany-gpt`'s node agent
/// uses for its own graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("received Ctrl+C, shutting down"),
        _ = terminate => log::info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    env_logger::init();

    let config = Config::load()?;
    let port = config.port;

    let pool = arc_storage::connect(&config.database_url).await?;
    log::info!("connected to database, migrations applied");

    let state = AppState::new(config, pool);
    let streams = state.streams.clone();

    let app = router::build(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            log::info!("draining in-flight streaming sessions");
            streams.cancel_all().await;
            // give background tasks a moment to observe the cancellation
            // flag and unregister before the process actually exits.
            tokio::time::sleep(Duration::from_millis(250)).await;
        })
        .await?;

    Ok(())
}
