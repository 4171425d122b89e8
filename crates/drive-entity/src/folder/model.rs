//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drive_core::types::FolderId;

/// Longest folder name accepted, in characters.
pub const FOLDER_NAME_MAX_CHARS: usize = 120;

/// A folder in the drive hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name, stored trimmed.
    pub name: String,
    /// Parent folder ID (null for root-level folders).
    pub parent_id: Option<FolderId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last renamed.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a new folder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Folder name, already trimmed and validated.
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Creation timestamp, also used as the initial `updated_at`.
    pub created_at: DateTime<Utc>,
}

impl NewFolder {
    /// Build an insert payload stamped with the current time.
    pub fn new(name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        Self {
            name: name.into(),
            parent_id,
            created_at: Utc::now(),
        }
    }

    /// Materialize the stored record under a store-generated id.
    pub fn into_record(self, id: FolderId) -> Folder {
        Folder {
            id,
            name: self.name,
            parent_id: self.parent_id,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
