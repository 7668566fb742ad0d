//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use webimg_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("{}:{}", config.bind_address, config.server_port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        download_root = %config.download_root.display(),
        default_quality = config.default_quality,
        default_column = %config.default_csv_column,
        max_upload_mb = config.max_upload_size_bytes / 1024 / 1024,
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM.
///
/// # Panics
/// Panics if a signal handler cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
