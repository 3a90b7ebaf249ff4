//! Database module for meta snapshot storage.
//!
//! This module abstracts persistence of the meta snapshot behind the
//! [`MetaStore`] trait so storage backends can be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Consumers (UI, schedule fetcher)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  MetaRepository (services) - translation + publishing   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  MetaStore trait (repository) - Abstract Interface      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐     ┌──────────▼──────────────┐
//! │ Local store      │     │  SQLite store           │
//! │ (in-memory)      │     │  (sqlite-repo feature)  │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! The module includes:
//! - `models`: The persisted [`StoredMeta`] shape and table columns
//! - `repository`: Trait definition and error types
//! - `repositories::local`: In-memory implementation
//! - `repositories::sqlite`: SQLite implementation
//! - `factory`: Factory for creating store instances
//! - `repo_config`: `repository.toml` support

#[cfg(not(any(feature = "sqlite-repo", feature = "local-repo")))]
compile_error!("Enable at least one store backend feature.");

pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use factory::{MetaStoreFactory, StoreType};
pub use models::{StoredHttpHeader, StoredMeta};
pub use repo_config::{RepositoryConfig, SqliteSettings};
pub use repositories::LocalMetaStore;
#[cfg(feature = "sqlite-repo")]
pub use repositories::SqliteMetaStore;
pub use repository::{ErrorContext, MetaStore, RepositoryError, RepositoryResult};
