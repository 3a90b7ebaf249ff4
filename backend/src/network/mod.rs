//! Network-side representation of schedule meta.
//!
//! The schedule fetch collaborator produces [`NetworkMeta`] values; nothing in
//! this crate performs network I/O itself.

pub mod models;

pub use models::{NetworkHttpHeader, NetworkMeta};
