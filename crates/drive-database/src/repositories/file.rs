//! File repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_core::types::{FileId, FolderId};
use drive_entity::file::File;

// Both listings must stay on the (parent_id, name COLLATE "C") index, so
// root gets its own `IS NULL` statement instead of `IS NOT DISTINCT FROM`.
const LIST_CHILDREN: &str = r#"SELECT * FROM files
    WHERE parent_id = $1
    ORDER BY name COLLATE "C" ASC, id ASC"#;

const LIST_ROOT: &str = r#"SELECT * FROM files
    WHERE parent_id IS NULL
    ORDER BY name COLLATE "C" ASC, id ASC"#;

/// Repository for file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find file", e)
            })
    }

    /// List files directly under `parent_id`, or root-level files for `None`.
    pub async fn find_by_folder(&self, parent_id: Option<FolderId>) -> AppResult<Vec<File>> {
        let query = match parent_id {
            Some(parent_id) => sqlx::query_as::<_, File>(LIST_CHILDREN).bind(parent_id),
            None => sqlx::query_as::<_, File>(LIST_ROOT),
        };

        query.fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list files", e)
        })
    }

    /// Insert a complete file row.
    pub async fn create(&self, file: &File) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            r#"INSERT INTO files (id, name, parent_id, size_bytes, mime_type, storage_path,
                                  created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(file.id)
        .bind(&file.name)
        .bind(file.parent_id)
        .bind(file.size_bytes)
        .bind(&file.mime_type)
        .bind(&file.storage_path)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to create file", e))
    }

    /// Rename a file, returning the updated row if it exists.
    pub async fn rename(
        &self,
        id: FileId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreUnavailable, "Failed to rename file", e))
    }

    /// Delete a file row.
    pub async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to delete file", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
