//! In-process tree store.
//!
//! [`MemoryTreeStore`] keeps folders and files in two collections, each a
//! map keyed by id plus a secondary index from parent id to child ids, so
//! listing children never scans the whole collection. Data is lost when the
//! store is dropped.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use drive_core::result::AppResult;
use drive_core::types::{FileId, FolderId};
use drive_entity::file::{File, NewFile};
use drive_entity::folder::{Folder, NewFolder};

use crate::store::TreeStore;

/// Access to the fields a collection indexes on.
trait Record: Clone + std::fmt::Debug {
    type Id: Copy + Eq + Hash + Ord + std::fmt::Debug;

    fn id(&self) -> Self::Id;
    fn parent_id(&self) -> Option<FolderId>;
    fn name(&self) -> &str;
    fn rename(&mut self, name: &str, updated_at: DateTime<Utc>);
}

impl Record for Folder {
    type Id = FolderId;

    fn id(&self) -> FolderId {
        self.id
    }

    fn parent_id(&self) -> Option<FolderId> {
        self.parent_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: &str, updated_at: DateTime<Utc>) {
        self.name = name.to_string();
        self.updated_at = updated_at;
    }
}

impl Record for File {
    type Id = FileId;

    fn id(&self) -> FileId {
        self.id
    }

    fn parent_id(&self) -> Option<FolderId> {
        self.parent_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rename(&mut self, name: &str, updated_at: DateTime<Utc>) {
        self.name = name.to_string();
        self.updated_at = updated_at;
    }
}

/// One record set with its by-parent index.
#[derive(Debug)]
struct Collection<R: Record> {
    records: HashMap<R::Id, R>,
    by_parent: HashMap<Option<FolderId>, HashSet<R::Id>>,
}

impl<R: Record> Collection<R> {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            by_parent: HashMap::new(),
        }
    }

    /// Insert or replace a record, keeping the index in step.
    fn put(&mut self, record: R) {
        let id = record.id();
        self.unlink(id);
        self.by_parent
            .entry(record.parent_id())
            .or_default()
            .insert(id);
        self.records.insert(id, record);
    }

    fn get(&self, id: R::Id) -> Option<R> {
        self.records.get(&id).cloned()
    }

    fn children(&self, parent_id: Option<FolderId>) -> Vec<R> {
        let mut children: Vec<R> = self
            .by_parent
            .get(&parent_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id).cloned())
            .collect();
        children.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        children
    }

    fn rename(&mut self, id: R::Id, name: &str, updated_at: DateTime<Utc>) -> Option<R> {
        let record = self.records.get_mut(&id)?;
        record.rename(name, updated_at);
        Some(record.clone())
    }

    fn remove(&mut self, id: R::Id) -> bool {
        self.unlink(id);
        self.records.remove(&id).is_some()
    }

    fn unlink(&mut self, id: R::Id) {
        let Some(parent_id) = self.records.get(&id).map(Record::parent_id) else {
            return;
        };
        if let Some(siblings) = self.by_parent.get_mut(&parent_id) {
            siblings.remove(&id);
            if siblings.is_empty() {
                self.by_parent.remove(&parent_id);
            }
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// An in-memory implementation of [`TreeStore`].
#[derive(Debug)]
pub struct MemoryTreeStore {
    folders: RwLock<Collection<Folder>>,
    files: RwLock<Collection<File>>,
}

impl MemoryTreeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            folders: RwLock::new(Collection::new()),
            files: RwLock::new(Collection::new()),
        }
    }

    /// Write a complete folder record as-is, replacing any record with the
    /// same id. Used to import records produced elsewhere; parent links are
    /// taken verbatim, dangling or not.
    pub async fn restore_folder(&self, folder: Folder) {
        self.folders.write().await.put(folder);
    }

    /// Number of folder records held.
    pub async fn folder_count(&self) -> usize {
        self.folders.read().await.len()
    }

    /// Number of file records held.
    pub async fn file_count(&self) -> usize {
        self.files.read().await.len()
    }
}

impl Default for MemoryTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn insert_folder(&self, data: NewFolder) -> AppResult<Folder> {
        let folder = data.into_record(FolderId::new());
        self.folders.write().await.put(folder.clone());
        Ok(folder)
    }

    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.folders.read().await.get(id))
    }

    async fn list_folders(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>> {
        Ok(self.folders.read().await.children(parent_id))
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Folder>> {
        Ok(self.folders.write().await.rename(id, name, updated_at))
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        Ok(self.folders.write().await.remove(id))
    }

    async fn insert_file(&self, data: NewFile) -> AppResult<File> {
        let file = data.into_record(FileId::new());
        self.files.write().await.put(file.clone());
        Ok(file)
    }

    async fn get_file(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.files.read().await.get(id))
    }

    async fn list_files(&self, parent_id: Option<FolderId>) -> AppResult<Vec<File>> {
        Ok(self.files.read().await.children(parent_id))
    }

    async fn rename_file(
        &self,
        id: FileId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<File>> {
        Ok(self.files.write().await.rename(id, name, updated_at))
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        Ok(self.files.write().await.remove(id))
    }
}
