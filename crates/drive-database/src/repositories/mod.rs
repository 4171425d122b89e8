//! PostgreSQL repositories for the folder and file collections.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;
