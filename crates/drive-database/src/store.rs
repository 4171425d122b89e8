//! The tree store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use drive_core::result::AppResult;
use drive_core::types::{FileId, FolderId};
use drive_entity::file::{File, NewFile};
use drive_entity::folder::{Folder, NewFolder};

/// Document storage for folder and file records.
///
/// Holds no business logic. Each operation is atomic for a single record;
/// nothing spans records. A missing record is reported as `None` / `false`
/// rather than an error so callers can branch on it. Listings are sorted
/// by name ascending (byte order). Parent references are not checked.
#[async_trait]
pub trait TreeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g., "memory", "postgres").
    fn backend(&self) -> &str;

    /// Check whether the store answers.
    async fn health_check(&self) -> AppResult<bool>;

    /// Insert a folder under a newly generated id.
    async fn insert_folder(&self, data: NewFolder) -> AppResult<Folder>;

    /// Find a folder by id.
    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// List folders whose parent is `parent_id` (`None` selects root-level).
    async fn list_folders(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>>;

    /// Set a folder's name and `updated_at`, returning the updated record.
    async fn rename_folder(
        &self,
        id: FolderId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Folder>>;

    /// Delete a folder record. Returns `true` if it existed.
    async fn delete_folder(&self, id: FolderId) -> AppResult<bool>;

    /// Insert a file under a newly generated id.
    async fn insert_file(&self, data: NewFile) -> AppResult<File>;

    /// Find a file by id.
    async fn get_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// List files whose parent is `parent_id` (`None` selects root-level).
    async fn list_files(&self, parent_id: Option<FolderId>) -> AppResult<Vec<File>>;

    /// Set a file's name and `updated_at`, returning the updated record.
    async fn rename_file(
        &self,
        id: FileId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<File>>;

    /// Delete a file record. Returns `true` if it existed.
    async fn delete_file(&self, id: FileId) -> AppResult<bool>;
}
