//! Response DTOs.

use serde::{Deserialize, Serialize};

use drive_entity::folder::Breadcrumb;
use drive_service::{DeleteReport, HealthReport};

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Greeting.
    pub message: String,
}

/// Body of `DELETE /drive/item/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Always `ok`.
    pub status: &'static str,
    /// What was removed.
    #[serde(flatten)]
    pub report: DeleteReport,
}

impl From<DeleteReport> for DeleteResponse {
    fn from(report: DeleteReport) -> Self {
        Self {
            status: "ok",
            report,
        }
    }
}

/// Body of `GET /drive/breadcrumbs/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct BreadcrumbsResponse {
    /// Root-to-leaf chain.
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `ok` when both stores answer, otherwise `degraded`.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Tree store backend name.
    pub tree_backend: String,
    /// `ok` or `unavailable`.
    pub tree_store: &'static str,
    /// Blob store backend name.
    pub blob_backend: String,
    /// `ok` or `unavailable`.
    pub blob_store: &'static str,
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        let label = |up: bool| if up { "ok" } else { "unavailable" };
        Self {
            status: if report.is_healthy() { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            tree_store: label(report.tree_store),
            blob_store: label(report.blob_store),
            tree_backend: report.tree_backend,
            blob_backend: report.blob_backend,
        }
    }
}
