//! File record operations: lookup, rename and single-file delete.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use drive_core::error::AppError;
use drive_core::traits::storage::BlobStore;
use drive_core::types::FileId;
use drive_database::TreeStore;
use drive_entity::file::File;
use drive_entity::node::NodeKind;

use crate::folder::DeleteReport;

/// Manages file records and their backing blobs.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Tree store holding folder and file records.
    tree: Arc<dyn TreeStore>,
    /// Blob store holding file contents.
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(tree: Arc<dyn TreeStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { tree, blobs }
    }

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: FileId) -> Result<File, AppError> {
        self.tree
            .get_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Renames a file. The blob is left untouched.
    pub async fn rename_file(&self, file_id: FileId, name: &str) -> Result<File, AppError> {
        let name = NodeKind::File.normalize_name(name)?;
        let file = self
            .tree
            .rename_file(file_id, &name, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        info!(file_id = %file_id, name = %file.name, "File renamed");

        Ok(file)
    }

    /// Deletes a file: its blob best-effort, then its record.
    ///
    /// A blob that was already gone counts as cleaned up; one the blob store
    /// failed to remove is listed in `orphaned_blobs`.
    pub async fn delete_file(&self, file_id: FileId) -> Result<DeleteReport, AppError> {
        let file = self.get_file(file_id).await?;
        let blob_removed = discard_blob(self.blobs.as_ref(), &file.storage_path).await;
        self.tree.delete_file(file.id).await?;

        info!(file_id = %file_id, blob_removed, "File deleted");

        Ok(DeleteReport {
            folders_deleted: 0,
            files_deleted: 1,
            orphaned_blobs: if blob_removed {
                Vec::new()
            } else {
                vec![file.storage_path]
            },
        })
    }
}

/// Delete a blob without letting a failure escape.
///
/// Returns `false` only when the blob store reported an error; the error is
/// logged at `warn` and swallowed.
pub(crate) async fn discard_blob(blobs: &dyn BlobStore, storage_path: &str) -> bool {
    if storage_path.is_empty() {
        return true;
    }
    match blobs.delete(storage_path).await {
        Ok(true) => true,
        Ok(false) => {
            debug!(storage_path, "Blob already absent");
            true
        }
        Err(e) => {
            warn!(storage_path, error = %e, "Failed to delete blob, continuing");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use drive_core::error::ErrorKind;
    use drive_database::MemoryTreeStore;
    use drive_entity::file::NewFile;
    use drive_storage::MemoryBlobStore;

    struct Fixture {
        tree: Arc<MemoryTreeStore>,
        blobs: Arc<MemoryBlobStore>,
        svc: FileService,
    }

    fn fixture() -> Fixture {
        let tree = Arc::new(MemoryTreeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let svc = FileService::new(tree.clone(), blobs.clone());
        Fixture { tree, blobs, svc }
    }

    async fn seed(fx: &Fixture, name: &str) -> File {
        let stored = fx.blobs.write(name, Bytes::from("data")).await.unwrap();
        fx.tree
            .insert_file(NewFile {
                name: name.to_string(),
                parent_id: None,
                size_bytes: stored.size_bytes as i64,
                mime_type: "text/plain".to_string(),
                storage_path: stored.storage_path,
                created_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_rename_keeps_blob() {
        let fx = fixture();
        let file = seed(&fx, "a.txt").await;

        let renamed = fx.svc.rename_file(file.id, "  b.txt ").await.unwrap();
        assert_eq!(renamed.name, "b.txt");
        assert_eq!(renamed.storage_path, file.storage_path);

        let err = fx.svc.rename_file(file.id, "   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = fx.svc.rename_file(FileId::new(), "x").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_blob() {
        let fx = fixture();
        let file = seed(&fx, "a.txt").await;

        let report = fx.svc.delete_file(file.id).await.unwrap();
        assert_eq!(report.files_deleted, 1);
        assert_eq!(report.folders_deleted, 0);
        assert!(report.orphaned_blobs.is_empty());
        assert!(fx.blobs.is_empty().await);
        assert!(fx.svc.get_file(file.id).await.unwrap_err().is_not_found());
        assert!(fx.svc.delete_file(file.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_blob() {
        let fx = fixture();
        let file = seed(&fx, "a.txt").await;
        fx.blobs.delete(&file.storage_path).await.unwrap();

        let report = fx.svc.delete_file(file.id).await.unwrap();
        assert!(report.orphaned_blobs.is_empty());
        assert_eq!(fx.tree.file_count().await, 0);
    }
}
