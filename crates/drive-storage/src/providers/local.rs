//! Local filesystem blob store.

use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_core::traits::storage::{BlobStore, ByteStream, StoredBlob};

use crate::paths;

/// Blob store writing each blob as one file under a root directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path, creating the
    /// directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a storage path to a file within the root.
    fn resolve(&self, storage_path: &str) -> Option<PathBuf> {
        paths::is_valid(storage_path).then(|| self.root.join(storage_path))
    }

    fn open_error(storage_path: &str, e: std::io::Error) -> AppError {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("Blob not found: {storage_path}"))
        } else {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to open blob: {storage_path}"),
                e,
            )
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn write_stream(
        &self,
        original_name: &str,
        mut stream: ByteStream,
    ) -> AppResult<StoredBlob> {
        let storage_path = paths::generate(original_name);
        let full_path = self.root.join(&storage_path);

        let mut file = fs::File::create_new(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to create blob: {storage_path}"),
                e,
            )
        })?;

        let mut total_bytes = 0u64;
        let written: AppResult<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Stream read error", e)
                })?;
                total_bytes += chunk.len() as u64;
                file.write_all(&chunk).await.map_err(|e| {
                    AppError::with_source(ErrorKind::StoreUnavailable, "Failed to write chunk", e)
                })?;
            }
            file.flush().await.map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to flush blob", e)
            })?;
            Ok(())
        }
        .await;

        if let Err(err) = written {
            drop(file);
            if let Err(e) = fs::remove_file(&full_path).await {
                warn!(storage_path, error = %e, "Failed to remove partial blob");
            }
            return Err(err);
        }

        debug!(storage_path, bytes = total_bytes, "Wrote blob from stream");
        Ok(StoredBlob {
            storage_path,
            size_bytes: total_bytes,
        })
    }

    async fn read(&self, storage_path: &str) -> AppResult<ByteStream> {
        let full_path = self
            .resolve(storage_path)
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {storage_path}")))?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| Self::open_error(storage_path, e))?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn size(&self, storage_path: &str) -> AppResult<Option<u64>> {
        let Some(full_path) = self.resolve(storage_path) else {
            return Ok(None);
        };
        match fs::metadata(&full_path).await {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to stat blob: {storage_path}"),
                e,
            )),
        }
    }

    async fn delete(&self, storage_path: &str) -> AppResult<bool> {
        let Some(full_path) = self.resolve(storage_path) else {
            return Ok(false);
        };
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(storage_path, "Deleted blob");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to delete blob: {storage_path}"),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    async fn read_all(store: &LocalBlobStore, storage_path: &str) -> Vec<u8> {
        let mut stream = store.read(storage_path).await.unwrap();
        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        collected
    }

    async fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let (_dir, store) = store().await;

        let stored = store
            .write("hello.txt", Bytes::from("hello world"))
            .await
            .unwrap();
        assert_eq!(stored.size_bytes, 11);
        assert!(stored.storage_path.ends_with("_hello.txt"));
        assert_eq!(store.size(&stored.storage_path).await.unwrap(), Some(11));
        assert_eq!(read_all(&store, &stored.storage_path).await, b"hello world");

        assert!(store.delete(&stored.storage_path).await.unwrap());
        assert_eq!(store.size(&stored.storage_path).await.unwrap(), None);
        assert!(!store.delete(&stored.storage_path).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_paths() {
        let (_dir, store) = store().await;
        let a = store.write("a.txt", Bytes::from("1")).await.unwrap();
        let b = store.write("a.txt", Bytes::from("2")).await.unwrap();
        assert_ne!(a.storage_path, b.storage_path);
        assert_eq!(read_all(&store, &a.storage_path).await, b"1");
        assert_eq!(read_all(&store, &b.storage_path).await, b"2");
    }

    #[tokio::test]
    async fn test_write_stream_counts_chunks() {
        let (_dir, store) = store().await;
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(Bytes::from("ab")), Ok(Bytes::from("cde")), Ok(Bytes::new())];
        let stream: ByteStream = Box::pin(futures::stream::iter(chunks));

        let stored = store.write_stream("multi.bin", stream).await.unwrap();
        assert_eq!(stored.size_bytes, 5);

        assert_eq!(read_all(&store, &stored.storage_path).await, b"abcde");
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_no_blob() {
        let (dir, store) = store().await;
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from("partial")),
            Err(std::io::Error::other("connection reset")),
        ];
        let stream: ByteStream = Box::pin(futures::stream::iter(chunks));

        let err = store.write_stream("broken.bin", stream).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_and_escaping_paths() {
        let (_dir, store) = store().await;
        for path in ["nope", "../etc/passwd"] {
            let err = store.read(path).await.err().unwrap();
            assert!(err.is_not_found());
        }
        assert_eq!(store.size("../etc/passwd").await.unwrap(), None);
        assert!(!store.delete("../etc/passwd").await.unwrap());
    }

    #[tokio::test]
    async fn test_traversal_name_stays_in_root() {
        let (dir, store) = store().await;
        let stored = store
            .write("../../escape.txt", Bytes::from("x"))
            .await
            .unwrap();
        assert!(dir.path().join(&stored.storage_path).is_file());
        assert!(store.health_check().await.unwrap());
    }
}
