//! Tree traversal: breadcrumbs and recursive folder deletion.
//!
//! Parent links are not trusted to form a tree. Both walks keep a visited
//! set: breadcrumbs stop at the first revisited id, and deletion refuses to
//! touch anything when its planning walk meets a folder twice.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use drive_core::error::AppError;
use drive_core::traits::storage::BlobStore;
use drive_core::types::FolderId;
use drive_database::TreeStore;
use drive_entity::file::File;
use drive_entity::folder::Breadcrumb;

use crate::file::service::discard_blob;

/// What a delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Folder records removed.
    pub folders_deleted: usize,
    /// File records removed.
    pub files_deleted: usize,
    /// Storage paths whose blob could not be removed.
    pub orphaned_blobs: Vec<String>,
}

/// One mutation in a planned subtree delete.
#[derive(Debug)]
enum Step {
    File(File),
    Folder(FolderId),
}

/// Planning walk frame.
enum Visit {
    Enter(FolderId),
    Exit(FolderId),
}

/// Walks and prunes the folder tree.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Tree store holding folder and file records.
    tree: Arc<dyn TreeStore>,
    /// Blob store holding file contents.
    blobs: Arc<dyn BlobStore>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(tree: Arc<dyn TreeStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { tree, blobs }
    }

    /// Returns the chain of folders from the topmost reachable ancestor
    /// down to `folder_id`, inclusive.
    ///
    /// The walk ends at a null parent or at a parent that no longer exists.
    pub async fn breadcrumbs(&self, folder_id: FolderId) -> Result<Vec<Breadcrumb>, AppError> {
        let start = self
            .tree
            .get_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        let mut visited = HashSet::from([start.id]);
        let mut next = start.parent_id;
        let mut chain = vec![Breadcrumb::from(&start)];

        while let Some(parent_id) = next {
            if !visited.insert(parent_id) {
                warn!(
                    folder_id = %folder_id,
                    revisited = %parent_id,
                    "Cycle in folder ancestry, truncating breadcrumbs"
                );
                break;
            }
            let Some(parent) = self.tree.get_folder(parent_id).await? else {
                break;
            };
            chain.push(Breadcrumb::from(&parent));
            next = parent.parent_id;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Deletes a folder and everything beneath it.
    ///
    /// At each level the folder's files go first, then each child folder is
    /// removed completely before its next sibling, and the folder's own
    /// record goes last. Blob cleanup is best-effort.
    pub async fn delete_folder(&self, folder_id: FolderId) -> Result<DeleteReport, AppError> {
        if self.tree.get_folder(folder_id).await?.is_none() {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        let steps = self.plan_delete(folder_id).await?;
        let mut report = DeleteReport::default();

        for step in steps {
            match step {
                Step::File(file) => {
                    if !discard_blob(self.blobs.as_ref(), &file.storage_path).await {
                        report.orphaned_blobs.push(file.storage_path.clone());
                    }
                    if self.tree.delete_file(file.id).await? {
                        report.files_deleted += 1;
                    }
                }
                Step::Folder(id) => {
                    if self.tree.delete_folder(id).await? {
                        report.folders_deleted += 1;
                    }
                }
            }
        }

        info!(
            folder_id = %folder_id,
            folders = report.folders_deleted,
            files = report.files_deleted,
            orphaned_blobs = report.orphaned_blobs.len(),
            "Folder tree deleted"
        );

        Ok(report)
    }

    /// Lists every mutation of a subtree delete, in execution order,
    /// without changing anything.
    async fn plan_delete(&self, root: FolderId) -> Result<Vec<Step>, AppError> {
        let mut steps = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![Visit::Enter(root)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    if !visited.insert(id) {
                        return Err(AppError::corrupt_tree(format!(
                            "Folder {id} is its own ancestor; nothing was deleted"
                        )));
                    }

                    let (folders, files) = tokio::try_join!(
                        self.tree.list_folders(Some(id)),
                        self.tree.list_files(Some(id)),
                    )?;

                    steps.extend(files.into_iter().map(Step::File));
                    stack.push(Visit::Exit(id));
                    stack.extend(folders.iter().rev().map(|f| Visit::Enter(f.id)));
                }
                Visit::Exit(id) => steps.push(Step::Folder(id)),
            }
        }

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Utc;
    use drive_core::error::ErrorKind;
    use drive_database::MemoryTreeStore;
    use drive_entity::file::NewFile;
    use drive_entity::folder::NewFolder;
    use drive_storage::MemoryBlobStore;

    struct Fixture {
        tree: Arc<MemoryTreeStore>,
        blobs: Arc<MemoryBlobStore>,
        svc: TreeService,
    }

    fn fixture() -> Fixture {
        let tree = Arc::new(MemoryTreeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let svc = TreeService::new(tree.clone(), blobs.clone());
        Fixture { tree, blobs, svc }
    }

    async fn folder(fx: &Fixture, name: &str, parent_id: Option<FolderId>) -> FolderId {
        fx.tree
            .insert_folder(NewFolder::new(name, parent_id))
            .await
            .unwrap()
            .id
    }

    async fn file(fx: &Fixture, name: &str, parent_id: FolderId) -> File {
        let stored = fx.blobs.write(name, Bytes::from(name.to_string())).await.unwrap();
        fx.tree
            .insert_file(NewFile {
                name: name.to_string(),
                parent_id: Some(parent_id),
                size_bytes: stored.size_bytes as i64,
                mime_type: "text/plain".to_string(),
                storage_path: stored.storage_path,
                created_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    async fn link(fx: &Fixture, id: FolderId, parent_id: FolderId) {
        let mut record = fx.tree.get_folder(id).await.unwrap().unwrap();
        record.parent_id = Some(parent_id);
        fx.tree.restore_folder(record).await;
    }

    #[tokio::test]
    async fn test_breadcrumbs_root_to_leaf() {
        let fx = fixture();
        let a = folder(&fx, "A", None).await;
        let b = folder(&fx, "B", Some(a)).await;
        let c = folder(&fx, "C", Some(b)).await;

        let crumbs = fx.svc.breadcrumbs(c).await.unwrap();
        let names: Vec<&str> = crumbs.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(crumbs[0].id, a);

        assert_eq!(fx.svc.breadcrumbs(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_breadcrumbs_stop_at_missing_parent() {
        let fx = fixture();
        let a = folder(&fx, "A", Some(FolderId::new())).await;
        let b = folder(&fx, "B", Some(a)).await;

        let crumbs = fx.svc.breadcrumbs(b).await.unwrap();
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0].id, a);
    }

    #[tokio::test]
    async fn test_breadcrumbs_missing_folder() {
        let fx = fixture();
        let err = fx.svc.breadcrumbs(FolderId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_breadcrumbs_terminate_on_cycle() {
        let fx = fixture();
        let a = folder(&fx, "A", None).await;
        let b = folder(&fx, "B", Some(a)).await;
        link(&fx, a, b).await;

        let crumbs = fx.svc.breadcrumbs(a).await.unwrap();
        let names: Vec<&str> = crumbs.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let self_loop = folder(&fx, "S", None).await;
        link(&fx, self_loop, self_loop).await;
        assert_eq!(fx.svc.breadcrumbs(self_loop).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_whole_subtree() {
        let fx = fixture();
        let root = folder(&fx, "root", None).await;
        let keep = folder(&fx, "keep", None).await;
        let kept_file = file(&fx, "kept.txt", keep).await;

        file(&fx, "r1.txt", root).await;
        file(&fx, "r2.txt", root).await;
        let a = folder(&fx, "a", Some(root)).await;
        let b = folder(&fx, "b", Some(root)).await;
        file(&fx, "a1.txt", a).await;
        let aa = folder(&fx, "aa", Some(a)).await;
        file(&fx, "aa1.txt", aa).await;
        file(&fx, "b1.txt", b).await;

        let report = fx.svc.delete_folder(root).await.unwrap();
        assert_eq!(report.folders_deleted, 4);
        assert_eq!(report.files_deleted, 5);
        assert!(report.orphaned_blobs.is_empty());

        assert_eq!(fx.tree.folder_count().await, 1);
        assert_eq!(fx.tree.file_count().await, 1);
        assert_eq!(fx.blobs.len().await, 1);
        assert!(fx.blobs.size(&kept_file.storage_path).await.unwrap().is_some());
        for id in [root, a, b, aa] {
            assert!(fx.tree.list_folders(Some(id)).await.unwrap().is_empty());
            assert!(fx.tree.list_files(Some(id)).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_delete_plan_order() {
        let fx = fixture();
        let root = folder(&fx, "root", None).await;
        let a = folder(&fx, "a", Some(root)).await;
        let b = folder(&fx, "b", Some(root)).await;
        let r = file(&fx, "r.txt", root).await;
        let x = file(&fx, "x.txt", a).await;

        let order: Vec<String> = fx
            .svc
            .plan_delete(root)
            .await
            .unwrap()
            .into_iter()
            .map(|step| match step {
                Step::File(f) => f.id.to_string(),
                Step::Folder(id) => id.to_string(),
            })
            .collect();

        let expected: Vec<String> = vec![
            r.id.to_string(),
            x.id.to_string(),
            a.to_string(),
            b.to_string(),
            root.to_string(),
        ];
        assert_eq!(order, expected);
    }

    #[tokio::test]
    async fn test_delete_cycle_is_corrupt_and_mutates_nothing() {
        let fx = fixture();
        let a = folder(&fx, "A", None).await;
        let b = folder(&fx, "B", Some(a)).await;
        file(&fx, "in_b.txt", b).await;
        link(&fx, a, b).await;

        let err = fx.svc.delete_folder(a).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::CorruptTree);
        assert_eq!(fx.tree.folder_count().await, 2);
        assert_eq!(fx.tree.file_count().await, 1);
        assert_eq!(fx.blobs.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_folder() {
        let fx = fixture();
        let err = fx.svc.delete_folder(FolderId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
