//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use drive_core::config::AppConfig;
use drive_service::DriveEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Drive engine over the configured stores
    pub engine: Arc<DriveEngine>,
}

impl AppState {
    /// Creates the state from a configuration and an engine.
    pub fn new(config: AppConfig, engine: DriveEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
