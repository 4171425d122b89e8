//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drive_core::types::{FileId, FolderId};

/// Longest file name accepted, in characters.
pub const FILE_NAME_MAX_CHARS: usize = 255;

/// MIME type recorded when the uploader supplies none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file stored in the drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// Display name (including extension), stored trimmed.
    pub name: String,
    /// The folder containing this file (null for root-level files).
    pub parent_id: Option<FolderId>,
    /// Size of the stored content in bytes.
    pub size_bytes: i64,
    /// MIME type of the content.
    pub mime_type: String,
    /// Opaque handle into the blob store.
    pub storage_path: String,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file was last renamed.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFile {
    /// Display name, already trimmed and validated.
    pub name: String,
    /// The folder to place the file in.
    pub parent_id: Option<FolderId>,
    /// Size of the written blob in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
    /// Where the blob store put the content.
    pub storage_path: String,
    /// Creation timestamp, also used as the initial `updated_at`.
    pub created_at: DateTime<Utc>,
}

impl NewFile {
    /// Materialize the stored record under a store-generated id.
    pub fn into_record(self, id: FileId) -> File {
        File {
            id,
            name: self.name,
            parent_id: self.parent_id,
            size_bytes: self.size_bytes,
            mime_type: self.mime_type,
            storage_path: self.storage_path,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
