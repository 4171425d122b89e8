//! Drive Server: hierarchical file drive over a tree store and a blob store.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use drive_api::{AppState, build_app};
use drive_core::config::{AppConfig, StoreBackend};
use drive_core::error::AppError;
use drive_database::{DatabasePool, MemoryTreeStore, PgTreeStore, TreeStore};
use drive_service::DriveEngine;
use drive_storage::LocalBlobStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("DRIVE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Build the configured tree store, connecting and migrating if needed.
async fn build_tree_store(config: &AppConfig) -> Result<Arc<dyn TreeStore>, AppError> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory tree store; records are lost on restart");
            Ok(Arc::new(MemoryTreeStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.store.database).await?;
            drive_database::migration::run_migrations(pool.pool()).await?;
            Ok(Arc::new(PgTreeStore::new(pool.into_pool())))
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Drive v{}", env!("CARGO_PKG_VERSION"));

    let tree_store = build_tree_store(&config).await?;
    tracing::info!(backend = tree_store.backend(), "Tree store ready");

    let blob_store = LocalBlobStore::new(&config.storage.root_path).await?;
    tracing::info!(root = %config.storage.root_path, "Blob store ready");

    let engine = DriveEngine::new(
        tree_store,
        Arc::new(blob_store),
        config.storage.max_upload_size_bytes,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(AppState::new(config, engine));

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(
            drive_core::error::ErrorKind::Internal,
            format!("Failed to bind {addr}"),
            e,
        )
    })?;

    tracing::info!("Drive server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Drive server stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
