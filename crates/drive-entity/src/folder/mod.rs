//! Folder records.

pub mod model;
pub mod tree;

pub use model::{Folder, NewFolder};
pub use tree::Breadcrumb;
