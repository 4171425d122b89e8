//! HTTP request handlers.

pub mod drive;
pub mod health;
