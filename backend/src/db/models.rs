//! Persisted representation of schedule meta.
//!
//! A store holds exactly one [`StoredMeta`] at a time. Every field except the
//! time-zone name is required; the translator fills in defaults before a value
//! ever reaches a store.

use serde::{Deserialize, Serialize};

use crate::models::COLD_START_VERSION;

/// Table and column names of the `metas` table.
pub mod columns {
    pub const TABLE: &str = "metas";
    pub const NUM_DAYS: &str = "numdays";
    pub const VERSION: &str = "version";
    pub const TITLE: &str = "title";
    pub const SUBTITLE: &str = "subtitle";
    pub const TIME_ZONE_NAME: &str = "time_zone_name";
    pub const ETAG: &str = "etag";
    pub const SCHEDULE_LAST_MODIFIED: &str = "schedule_last_modified";
}

/// Caching headers as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHttpHeader {
    pub e_tag: String,
    pub last_modified: String,
}

/// The single persisted meta snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMeta {
    pub num_days: i32,
    pub version: String,
    pub time_zone_name: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub http_header: StoredHttpHeader,
}

impl StoredMeta {
    /// Snapshot a freshly created local store is seeded with.
    pub fn seed() -> Self {
        Self {
            version: COLD_START_VERSION.to_string(),
            ..Default::default()
        }
    }
}
