//! The [`DriveEngine`] facade.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use drive_core::result::AppResult;
use drive_core::traits::storage::BlobStore;
use drive_core::types::{FileId, FolderId};
use drive_database::TreeStore;
use drive_entity::file::File;
use drive_entity::folder::{Breadcrumb, Folder};
use drive_entity::node::{DriveItem, DriveListing, NodeKind};

use crate::file::{DownloadService, FileDownload, FileService, UploadRequest, UploadService};
use crate::folder::{DeleteReport, FolderService, TreeService};

/// Whether each backing store answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Tree store backend name.
    pub tree_backend: String,
    /// Tree store reachable.
    pub tree_store: bool,
    /// Blob store backend name.
    pub blob_backend: String,
    /// Blob store reachable.
    pub blob_store: bool,
}

impl HealthReport {
    /// Both stores answered.
    pub fn is_healthy(&self) -> bool {
        self.tree_store && self.blob_store
    }
}

/// Entry point for every drive operation.
///
/// Stateless apart from its store handles; cheap to clone and safe to share
/// across concurrent requests.
#[derive(Debug, Clone)]
pub struct DriveEngine {
    tree_store: Arc<dyn TreeStore>,
    blob_store: Arc<dyn BlobStore>,
    folders: FolderService,
    tree: TreeService,
    files: FileService,
    uploads: UploadService,
    downloads: DownloadService,
}

impl DriveEngine {
    /// Wires every service over the given stores.
    pub fn new(
        tree_store: Arc<dyn TreeStore>,
        blob_store: Arc<dyn BlobStore>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            folders: FolderService::new(tree_store.clone()),
            tree: TreeService::new(tree_store.clone(), blob_store.clone()),
            files: FileService::new(tree_store.clone(), blob_store.clone()),
            uploads: UploadService::new(
                tree_store.clone(),
                blob_store.clone(),
                max_upload_size_bytes,
            ),
            downloads: DownloadService::new(tree_store.clone(), blob_store.clone()),
            tree_store,
            blob_store,
        }
    }

    /// Folders and files directly under `parent_id` (`None` for root).
    pub async fn list_children(&self, parent_id: Option<FolderId>) -> AppResult<DriveListing> {
        self.folders.list_children(parent_id).await
    }

    /// Creates a folder.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        self.folders.create_folder(name, parent_id).await
    }

    /// Stores an uploaded file.
    pub async fn upload_file(&self, req: UploadRequest) -> AppResult<File> {
        self.uploads.upload(req).await
    }

    /// Opens a file's contents.
    pub async fn download_file(&self, file_id: FileId) -> AppResult<FileDownload> {
        self.downloads.download(file_id).await
    }

    /// Renames a folder or a file.
    pub async fn rename_item(&self, kind: NodeKind, id: Uuid, name: &str) -> AppResult<DriveItem> {
        match kind {
            NodeKind::Folder => self
                .folders
                .rename_folder(FolderId::from_uuid(id), name)
                .await
                .map(DriveItem::Folder),
            NodeKind::File => self
                .files
                .rename_file(FileId::from_uuid(id), name)
                .await
                .map(DriveItem::File),
        }
    }

    /// Deletes a file, or a folder with its whole subtree.
    pub async fn delete_item(&self, kind: NodeKind, id: Uuid) -> AppResult<DeleteReport> {
        match kind {
            NodeKind::Folder => self.tree.delete_folder(FolderId::from_uuid(id)).await,
            NodeKind::File => self.files.delete_file(FileId::from_uuid(id)).await,
        }
    }

    /// Ancestor chain of a folder, root first.
    pub async fn breadcrumbs(&self, folder_id: FolderId) -> AppResult<Vec<Breadcrumb>> {
        self.tree.breadcrumbs(folder_id).await
    }

    /// Probes both stores.
    pub async fn health(&self) -> HealthReport {
        let tree_store = self.tree_store.health_check().await.unwrap_or_else(|e| {
            warn!(error = %e, "Tree store health check failed");
            false
        });
        let blob_store = self.blob_store.health_check().await.unwrap_or_else(|e| {
            warn!(error = %e, "Blob store health check failed");
            false
        });

        HealthReport {
            tree_backend: self.tree_store.backend().to_string(),
            tree_store,
            blob_backend: self.blob_store.provider_type().to_string(),
            blob_store,
        }
    }
}
