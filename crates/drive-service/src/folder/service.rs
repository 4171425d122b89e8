//! Folder listing, creation and renaming.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use drive_core::error::AppError;
use drive_core::types::FolderId;
use drive_database::TreeStore;
use drive_entity::folder::{Folder, NewFolder};
use drive_entity::node::{DriveListing, NodeKind};

/// Manages folder records.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Tree store holding folder and file records.
    tree: Arc<dyn TreeStore>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(tree: Arc<dyn TreeStore>) -> Self {
        Self { tree }
    }

    /// Lists the folders and files directly under `parent_id`
    /// (`None` selects root-level nodes).
    pub async fn list_children(
        &self,
        parent_id: Option<FolderId>,
    ) -> Result<DriveListing, AppError> {
        let (folders, files) = tokio::try_join!(
            self.tree.list_folders(parent_id),
            self.tree.list_files(parent_id),
        )?;
        Ok(DriveListing { folders, files })
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> Result<Folder, AppError> {
        self.tree
            .get_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Creates a new folder. The parent is not required to exist.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<Folder, AppError> {
        let name = NodeKind::Folder.normalize_name(name)?;
        let folder = self.tree.insert_folder(NewFolder::new(name, parent_id)).await?;

        info!(
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            name = %folder.name,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(&self, folder_id: FolderId, name: &str) -> Result<Folder, AppError> {
        let name = NodeKind::Folder.normalize_name(name)?;
        let folder = self
            .tree
            .rename_folder(folder_id, &name, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        info!(folder_id = %folder_id, name = %folder.name, "Folder renamed");

        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_core::error::ErrorKind;
    use drive_database::MemoryTreeStore;

    fn service() -> FolderService {
        FolderService::new(Arc::new(MemoryTreeStore::new()))
    }

    #[tokio::test]
    async fn test_create_trims_and_lists_under_parent() {
        let svc = service();
        let docs = svc.create_folder("  Docs  ", None).await.unwrap();
        assert_eq!(docs.name, "Docs");
        assert_eq!(docs.created_at, docs.updated_at);

        svc.create_folder("b", Some(docs.id)).await.unwrap();
        svc.create_folder("a", Some(docs.id)).await.unwrap();

        let root = svc.list_children(None).await.unwrap();
        assert_eq!(root.folders.len(), 1);
        assert_eq!(root.folders[0].id, docs.id);

        let inner = svc.list_children(Some(docs.id)).await.unwrap();
        let names: Vec<&str> = inner.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(inner.files.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let err = service().create_folder(" \t ", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_under_unknown_parent_is_allowed() {
        let svc = service();
        let ghost = FolderId::new();
        let folder = svc.create_folder("orphan", Some(ghost)).await.unwrap();
        assert_eq!(folder.parent_id, Some(ghost));
        assert_eq!(svc.list_children(Some(ghost)).await.unwrap().folders.len(), 1);
    }

    #[tokio::test]
    async fn test_rename() {
        let svc = service();
        let folder = svc.create_folder("old", None).await.unwrap();

        let renamed = svc.rename_folder(folder.id, " new ").await.unwrap();
        assert_eq!(renamed.name, "new");
        assert!(renamed.updated_at >= folder.updated_at);
        assert_eq!(svc.get_folder(folder.id).await.unwrap().name, "new");

        let err = svc.rename_folder(folder.id, "").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = svc.rename_folder(FolderId::new(), "x").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
