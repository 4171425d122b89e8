//! Route definitions for the Drive HTTP API.
//!
//! Drive routes are mounted under `/drive`; readiness and health sit at
//! the root. The router receives `AppState` and passes it to all handlers
//! via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and the `parent_id` field on top of the
/// file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .merge(health_routes())
        .nest("/drive", drive_routes(max_upload))
        .with_state(state)
}

/// Readiness and health probes.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::ready))
        .route("/health", get(handlers::health::health))
}

/// Drive endpoints.
fn drive_routes(max_upload: usize) -> Router<AppState> {
    Router::new()
        .route("/list", get(handlers::drive::list_children))
        .route("/folder", post(handlers::drive::create_folder))
        .route(
            "/upload",
            post(handlers::drive::upload_file).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/download/{file_id}", get(handlers::drive::download_file))
        .route("/rename", patch(handlers::drive::rename_item))
        .route("/item/{item_id}", delete(handlers::drive::delete_item))
        .route("/breadcrumbs/{folder_id}", get(handlers::drive::breadcrumbs))
}
