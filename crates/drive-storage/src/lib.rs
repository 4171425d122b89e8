//! # drive-storage
//!
//! Blob store implementations for Drive file contents. Supports the local
//! filesystem and an in-process map for tests and ephemeral deployments.

pub mod paths;
pub mod providers;

pub use providers::local::LocalBlobStore;
pub use providers::memory::MemoryBlobStore;
