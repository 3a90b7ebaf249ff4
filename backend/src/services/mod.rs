//! Service layer for meta synchronization.
//!
//! This module sits between the store and consumers: it translates between
//! the three meta shapes, schedules store work on the database execution
//! context and publishes the result.

pub mod execution;
pub mod meta_repository;
pub mod meta_translator;

pub use execution::{DatabaseRuntime, ExecutionContext};
pub use meta_repository::{MetaRepository, MetaSubscription, SyncState};
pub use meta_translator::{network_to_stored, parse_time_zone, stored_to_domain};
