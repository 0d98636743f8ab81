//! HTTP server command.

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::db::Database;

/// Connect, migrate and serve until shutdown.
pub async fn run(args: ServeArgs, mut config: Config) -> AppResult<()> {
    config.server_host = args.host;
    config.server_port = args.port;

    let database = Database::connect(&config).await;
    database.ping().await?;

    let addr = config.server_addr();
    let state = AppState::from_connection(database.get_connection(), config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
