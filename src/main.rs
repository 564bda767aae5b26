//! Idea Flow Backup Server - Binary Entry Point
//!
//! Parses configuration, initializes tracing, opens the backup store and
//! serves the HTTP API until Ctrl+C / SIGTERM.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idea_flow_backup::api::http::create_router;
use idea_flow_backup::api::state::AppState;
use idea_flow_backup::config::ServerConfig;
use idea_flow_backup::store::SnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "idea_flow_backup=info,idea_flow_server=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = config.validate()?;
    let store = SnapshotStore::open(config.store_config())?;

    tracing::info!("Idea Flow Server v{}", idea_flow_backup::VERSION);
    tracing::info!("URL:       http://{}", addr);
    tracing::info!("Backups:   {}", store.config().dir().display());
    tracing::info!("Retention: {} most recent backups", store.keep_count());
    if let Some(dir) = &config.static_dir {
        tracing::info!("Static:    {}", dir.display());
    }

    let app = create_router(Arc::new(AppState::new(store)), &config.http_config());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
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
