//! Folder repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_core::types::FolderId;
use drive_entity::folder::Folder;

// Both listings must stay on the (parent_id, name COLLATE "C") index, so
// root gets its own `IS NULL` statement instead of `IS NOT DISTINCT FROM`.
const LIST_CHILDREN: &str = r#"SELECT * FROM folders
    WHERE parent_id = $1
    ORDER BY name COLLATE "C" ASC, id ASC"#;

const LIST_ROOT: &str = r#"SELECT * FROM folders
    WHERE parent_id IS NULL
    ORDER BY name COLLATE "C" ASC, id ASC"#;

/// Repository for folder rows.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find folder", e)
            })
    }

    /// List folders directly under `parent_id`, or root-level folders for `None`.
    pub async fn find_children(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>> {
        let query = match parent_id {
            Some(parent_id) => sqlx::query_as::<_, Folder>(LIST_CHILDREN).bind(parent_id),
            None => sqlx::query_as::<_, Folder>(LIST_ROOT),
        };

        query.fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list folders", e)
        })
    }

    /// Insert a complete folder row.
    pub async fn create(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            r#"INSERT INTO folders (id, name, parent_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(folder.parent_id)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to create folder", e)
        })
    }

    /// Rename a folder, returning the updated row if it exists.
    pub async fn rename(
        &self,
        id: FolderId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to rename folder", e)
        })
    }

    /// Delete a folder row.
    pub async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreUnavailable, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listings_use_indexable_parent_predicates() {
        assert!(LIST_CHILDREN.contains("WHERE parent_id = $1"));
        assert!(LIST_ROOT.contains("WHERE parent_id IS NULL"));
        for sql in [LIST_CHILDREN, LIST_ROOT] {
            assert!(!sql.contains("DISTINCT"));
            assert!(sql.contains(r#"ORDER BY name COLLATE "C""#));
        }
    }
}
