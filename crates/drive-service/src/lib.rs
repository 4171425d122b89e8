//! # drive-service
//!
//! The Drive engine. Each service orchestrates the tree store and the blob
//! store to implement one group of use cases; [`DriveEngine`] bundles them
//! behind the operations the HTTP layer calls.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references. No service holds locks or
//! in-process state of its own.

pub mod drive;
pub mod file;
pub mod folder;

pub use drive::{DriveEngine, HealthReport};
pub use file::{DownloadService, FileDownload, FileService, UploadRequest, UploadService};
pub use folder::{DeleteReport, FolderService, TreeService};
