//! Meta store implementations.
//!
//! - `local`: In-memory implementation for unit testing and local development
//! - `sqlite`: SQLite implementation for durable storage (feature `sqlite-repo`)

pub mod local;
#[cfg(feature = "sqlite-repo")]
pub mod sqlite;

pub use local::LocalMetaStore;
#[cfg(feature = "sqlite-repo")]
pub use sqlite::SqliteMetaStore;
