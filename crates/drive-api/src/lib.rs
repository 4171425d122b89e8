//! # drive-api
//!
//! HTTP API layer for Drive built on Axum.
//!
//! Provides the `/drive` endpoints, health probes, middleware (CORS,
//! compression, request logging), DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
