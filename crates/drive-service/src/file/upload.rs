//! File upload: blob first, then the record.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use drive_core::error::{AppError, ErrorKind};
use drive_core::traits::storage::BlobStore;
use drive_core::types::FolderId;
use drive_database::TreeStore;
use drive_entity::file::{DEFAULT_MIME_TYPE, File, NewFile};
use drive_entity::node::NodeKind;

use super::service::discard_blob;

/// Input for a single upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target folder (None for root-level).
    pub parent_id: Option<FolderId>,
    /// Client-supplied file name.
    pub name: String,
    /// File contents.
    pub data: Bytes,
    /// Client-supplied MIME type.
    pub mime_type: Option<String>,
}

/// Handles file uploads.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Tree store holding folder and file records.
    tree: Arc<dyn TreeStore>,
    /// Blob store holding file contents.
    blobs: Arc<dyn BlobStore>,
    /// Largest accepted upload.
    max_upload_size_bytes: u64,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        tree: Arc<dyn TreeStore>,
        blobs: Arc<dyn BlobStore>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            tree,
            blobs,
            max_upload_size_bytes,
        }
    }

    /// Stores the contents, then records the file.
    ///
    /// If the blob write fails nothing is recorded. If recording fails the
    /// blob is removed again (best-effort).
    pub async fn upload(&self, req: UploadRequest) -> Result<File, AppError> {
        let name = NodeKind::File.normalize_name(&req.name)?;

        let expected = req.data.len() as u64;
        if expected > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File size {expected} exceeds maximum {}",
                self.max_upload_size_bytes
            )));
        }

        let mime_type = req
            .mime_type
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let stored = self.blobs.write(&name, req.data).await?;

        if stored.size_bytes != expected {
            discard_blob(self.blobs.as_ref(), &stored.storage_path).await;
            return Err(AppError::new(
                ErrorKind::StoreUnavailable,
                format!(
                    "Blob store persisted {} of {expected} bytes",
                    stored.size_bytes
                ),
            ));
        }

        let size_bytes = i64::try_from(stored.size_bytes)
            .map_err(|_| AppError::validation("File size out of range"))?;
        let new_file = NewFile {
            name,
            parent_id: req.parent_id,
            size_bytes,
            mime_type,
            storage_path: stored.storage_path.clone(),
            created_at: Utc::now(),
        };

        let file = match self.tree.insert_file(new_file).await {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    storage_path = %stored.storage_path,
                    error = %e,
                    "Recording upload failed, removing blob"
                );
                discard_blob(self.blobs.as_ref(), &stored.storage_path).await;
                return Err(e);
            }
        };

        info!(
            file_id = %file.id,
            parent_id = ?file.parent_id,
            name = %file.name,
            size = file.size_bytes,
            "File uploaded"
        );

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use drive_core::result::AppResult;
    use drive_core::traits::storage::{ByteStream, StoredBlob};
    use drive_database::MemoryTreeStore;
    use drive_storage::MemoryBlobStore;

    /// Blob store that keeps every byte but reports one fewer than it got.
    #[derive(Debug, Default)]
    struct ShortWriteBlobStore {
        inner: MemoryBlobStore,
    }

    #[async_trait]
    impl BlobStore for ShortWriteBlobStore {
        fn provider_type(&self) -> &str {
            "short-write"
        }

        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }

        async fn write_stream(&self, name: &str, stream: ByteStream) -> AppResult<StoredBlob> {
            let mut stored = self.inner.write_stream(name, stream).await?;
            stored.size_bytes = stored.size_bytes.saturating_sub(1);
            Ok(stored)
        }

        async fn read(&self, path: &str) -> AppResult<ByteStream> {
            self.inner.read(path).await
        }

        async fn size(&self, path: &str) -> AppResult<Option<u64>> {
            self.inner.size(path).await
        }

        async fn delete(&self, path: &str) -> AppResult<bool> {
            self.inner.delete(path).await
        }
    }

    fn request(name: &str, data: &'static str) -> UploadRequest {
        UploadRequest {
            parent_id: None,
            name: name.to_string(),
            data: Bytes::from_static(data.as_bytes()),
            mime_type: None,
        }
    }

    #[tokio::test]
    async fn test_short_write_leaves_no_blob_and_no_record() {
        let tree = Arc::new(MemoryTreeStore::new());
        let blobs = Arc::new(ShortWriteBlobStore::default());
        let svc = UploadService::new(tree.clone(), blobs.clone(), 1024);

        let err = svc.upload(request("a.txt", "hello")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(blobs.inner.is_empty().await);
        assert_eq!(tree.file_count().await, 0);
    }

    #[tokio::test]
    async fn test_size_matches_bytes_written() {
        let tree = Arc::new(MemoryTreeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let svc = UploadService::new(tree.clone(), blobs.clone(), 5);

        let file = svc.upload(request("a.txt", "hello")).await.unwrap();
        assert_eq!(file.size_bytes, 5);
        assert_eq!(file.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(blobs.size(&file.storage_path).await.unwrap(), Some(5));

        let err = svc.upload(request("b.txt", "hello!")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(blobs.len().await, 1);
        assert_eq!(tree.file_count().await, 1);
    }
}
