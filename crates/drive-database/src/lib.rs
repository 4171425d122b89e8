//! # drive-database
//!
//! Tree store backends for Drive folder and file records: an in-process
//! [`MemoryTreeStore`] and a PostgreSQL-backed [`PgTreeStore`], plus
//! connection management and migrations for the latter.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryTreeStore;
pub use postgres::PgTreeStore;
pub use store::TreeStore;
