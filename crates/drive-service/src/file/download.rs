//! File download: resolves the record and opens its blob as a stream.

use std::sync::Arc;

use tracing::warn;

use drive_core::error::AppError;
use drive_core::traits::storage::{BlobStore, ByteStream};
use drive_core::types::FileId;
use drive_database::TreeStore;
use drive_entity::file::File;

/// An open download: the file record plus its content stream.
pub struct FileDownload {
    /// File metadata.
    pub file: File,
    /// Length of the stored blob, which is what the stream yields.
    pub content_length: u64,
    /// File contents.
    pub stream: ByteStream,
}

impl FileDownload {
    /// MIME type for the Content-Type header.
    pub fn content_type(&self) -> &str {
        &self.file.mime_type
    }

    /// Suggested filename for Content-Disposition.
    pub fn filename(&self) -> &str {
        &self.file.name
    }
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("file", &self.file)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Handles file downloads.
#[derive(Debug, Clone)]
pub struct DownloadService {
    /// Tree store holding folder and file records.
    tree: Arc<dyn TreeStore>,
    /// Blob store holding file contents.
    blobs: Arc<dyn BlobStore>,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(tree: Arc<dyn TreeStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { tree, blobs }
    }

    /// Opens a file for download.
    ///
    /// A record whose blob is missing is reported exactly like a missing
    /// record. The content length comes from the blob store, not the record.
    pub async fn download(&self, file_id: FileId) -> Result<FileDownload, AppError> {
        let file = self
            .tree
            .get_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        if file.storage_path.is_empty() {
            return Err(AppError::not_found(format!("File {file_id} has no content")));
        }

        let missing = || AppError::not_found(format!("File {file_id} content is missing"));

        let content_length = self
            .blobs
            .size(&file.storage_path)
            .await?
            .ok_or_else(missing)?;

        if content_length != file.size_bytes as u64 {
            warn!(
                file_id = %file_id,
                recorded = file.size_bytes,
                stored = content_length,
                "Blob length differs from the file record"
            );
        }

        let stream = self
            .blobs
            .read(&file.storage_path)
            .await
            .map_err(|e| if e.is_not_found() { missing() } else { e })?;

        Ok(FileDownload {
            file,
            content_length,
            stream,
        })
    }
}
