//! In-memory blob store.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::StreamExt;
use tokio::sync::RwLock;
use tracing::debug;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_core::traits::storage::{BlobStore, ByteStream, StoredBlob};

use crate::paths;

/// Blob store holding contents in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs held.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    fn missing(storage_path: &str) -> AppError {
        AppError::not_found(format!("Blob not found: {storage_path}"))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write_stream(
        &self,
        original_name: &str,
        mut stream: ByteStream,
    ) -> AppResult<StoredBlob> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Stream read error", e)
            })?;
            buf.extend_from_slice(&chunk);
        }

        let storage_path = paths::generate(original_name);
        let size_bytes = buf.len() as u64;
        self.blobs
            .write()
            .await
            .insert(storage_path.clone(), buf.freeze());

        debug!(storage_path, bytes = size_bytes, "Stored blob in memory");
        Ok(StoredBlob {
            storage_path,
            size_bytes,
        })
    }

    async fn read(&self, storage_path: &str) -> AppResult<ByteStream> {
        let data = self
            .blobs
            .read()
            .await
            .get(storage_path)
            .cloned()
            .ok_or_else(|| Self::missing(storage_path))?;
        Ok(Box::pin(futures::stream::once(async move { Ok(data) })))
    }

    async fn size(&self, storage_path: &str) -> AppResult<Option<u64>> {
        Ok(self
            .blobs
            .read()
            .await
            .get(storage_path)
            .map(|data| data.len() as u64))
    }

    async fn delete(&self, storage_path: &str) -> AppResult<bool> {
        Ok(self.blobs.write().await.remove(storage_path).is_some())
    }
}
