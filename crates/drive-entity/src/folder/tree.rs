//! Ancestor chain entries for breadcrumb navigation.

use serde::{Deserialize, Serialize};

use drive_core::types::FolderId;

use super::model::Folder;

/// One step of a root-to-folder chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
}

impl From<&Folder> for Breadcrumb {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
        }
    }
}
