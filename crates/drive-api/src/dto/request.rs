//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Query for `GET /drive/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Parent folder; absent or empty selects root-level nodes.
    pub parent_id: Option<String>,
}

/// Body for `POST /drive/folder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[serde(default)]
    pub name: String,
    /// Parent folder; absent, null or empty means root.
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Body for `PATCH /drive/rename`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    /// Item id.
    #[serde(default)]
    pub id: String,
    /// `file` or `folder`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// New name.
    #[serde(default)]
    pub name: String,
}

/// Query for `DELETE /drive/item/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteQuery {
    /// `file` or `folder`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
