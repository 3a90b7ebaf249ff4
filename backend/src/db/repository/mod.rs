//! Store trait definitions.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for store and repository operations
//! - [`meta`]: The single-slot [`MetaStore`] contract

pub mod error;
pub mod meta;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use meta::MetaStore;
