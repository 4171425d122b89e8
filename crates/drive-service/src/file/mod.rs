//! File management services: rename/delete, upload, download.

pub mod download;
pub mod service;
pub mod upload;

pub use download::{DownloadService, FileDownload};
pub use service::FileService;
pub use upload::{UploadRequest, UploadService};
