//! Parsing helpers for path, query and body values.

pub mod path;

pub use path::{content_disposition, parse_kind, parse_uuid};
