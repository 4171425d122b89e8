//! PostgreSQL tree store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use drive_core::result::AppResult;
use drive_core::types::{FileId, FolderId};
use drive_entity::file::{File, NewFile};
use drive_entity::folder::{Folder, NewFolder};

use crate::repositories::{FileRepository, FolderRepository};
use crate::store::TreeStore;

/// A [`TreeStore`] backed by the `folders` and `files` tables.
#[derive(Debug, Clone)]
pub struct PgTreeStore {
    pool: PgPool,
    folders: FolderRepository,
    files: FileRepository,
}

impl PgTreeStore {
    /// Create a store over an existing pool. Migrations must already be applied.
    pub fn new(pool: PgPool) -> Self {
        Self {
            folders: FolderRepository::new(pool.clone()),
            files: FileRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl TreeStore for PgTreeStore {
    fn backend(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(true)
    }

    async fn insert_folder(&self, data: NewFolder) -> AppResult<Folder> {
        self.folders.create(&data.into_record(FolderId::new())).await
    }

    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(id).await
    }

    async fn list_folders(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>> {
        self.folders.find_children(parent_id).await
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Folder>> {
        self.folders.rename(id, name, updated_at).await
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        self.folders.delete(id).await
    }

    async fn insert_file(&self, data: NewFile) -> AppResult<File> {
        self.files.create(&data.into_record(FileId::new())).await
    }

    async fn get_file(&self, id: FileId) -> AppResult<Option<File>> {
        self.files.find_by_id(id).await
    }

    async fn list_files(&self, parent_id: Option<FolderId>) -> AppResult<Vec<File>> {
        self.files.find_by_folder(parent_id).await
    }

    async fn rename_file(
        &self,
        id: FileId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        self.files.rename(id, name, updated_at).await
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        self.files.delete(id).await
    }
}
