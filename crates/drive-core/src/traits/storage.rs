//! Blob store trait for pluggable file content backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Outcome of persisting one blob.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredBlob {
    /// Opaque handle under which the bytes were stored. Never reused.
    pub storage_path: String,
    /// Number of bytes actually persisted.
    pub size_bytes: u64,
}

/// Trait for physical byte storage.
///
/// Every write gets a fresh storage path derived from a distinct component
/// and the original file name. Deleting a path that no longer exists is
/// not an error: cleanup callers must tolerate already-removed blobs.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Persist a byte stream under a newly generated path.
    async fn write_stream(&self, original_name: &str, stream: ByteStream) -> AppResult<StoredBlob>;

    /// Persist an in-memory buffer under a newly generated path.
    async fn write(&self, original_name: &str, data: Bytes) -> AppResult<StoredBlob> {
        let stream: ByteStream = Box::pin(futures::stream::once(async move { Ok(data) }));
        self.write_stream(original_name, stream).await
    }

    /// Open a blob for streaming. Fails with `NotFound` if it is absent.
    async fn read(&self, storage_path: &str) -> AppResult<ByteStream>;

    /// Length of a stored blob in bytes, or `None` when nothing is stored at
    /// the path.
    async fn size(&self, storage_path: &str) -> AppResult<Option<u64>>;

    /// Delete a blob. Returns `false` when nothing was stored at the path.
    async fn delete(&self, storage_path: &str) -> AppResult<bool>;
}
