//! # drive-entity
//!
//! Record models for Drive. Every struct in this crate represents a stored
//! folder or file record, or a value object derived from them. Stored
//! records additionally derive `sqlx::FromRow`.

pub mod file;
pub mod folder;
pub mod node;

pub use file::{File, NewFile};
pub use folder::{Breadcrumb, Folder, NewFolder};
pub use node::{DriveItem, DriveListing, NodeKind};
