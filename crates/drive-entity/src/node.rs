//! Types shared by both node kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use drive_core::error::AppError;

use crate::file::File;
use crate::folder::Folder;

/// The two kinds of node in the drive tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A folder record.
    Folder,
    /// A file record.
    File,
}

impl NodeKind {
    /// Longest accepted name for this kind, in characters.
    pub fn max_name_chars(self) -> usize {
        match self {
            Self::Folder => crate::folder::model::FOLDER_NAME_MAX_CHARS,
            Self::File => crate::file::model::FILE_NAME_MAX_CHARS,
        }
    }

    /// Trim a client-supplied name and check it fits this kind.
    pub fn normalize_name(self, raw: &str) -> Result<String, AppError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name required"));
        }
        let max = self.max_name_chars();
        if name.chars().count() > max {
            return Err(AppError::validation(format!(
                "{self} name exceeds {max} characters"
            )));
        }
        Ok(name.to_string())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::File => write!(f, "file"),
        }
    }
}

impl FromStr for NodeKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(Self::Folder),
            "file" => Ok(Self::File),
            other => Err(AppError::validation(format!(
                "Invalid type '{other}', expected 'file' or 'folder'"
            ))),
        }
    }
}

/// The direct children of one parent, each list sorted by name ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveListing {
    /// Child folders.
    pub folders: Vec<Folder>,
    /// Child files.
    pub files: Vec<File>,
}

/// A single node of either kind, serialized as the bare record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DriveItem {
    /// A folder record.
    Folder(Folder),
    /// A file record.
    File(File),
}

impl DriveItem {
    /// Kind of the wrapped record.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Folder(_) => NodeKind::Folder,
            Self::File(_) => NodeKind::File,
        }
    }

    /// Name of the wrapped record.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::File(file) => &file.name,
        }
    }
}
