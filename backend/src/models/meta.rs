//! Application-facing meta model.
//!
//! This is the shape handed to UI and other in-process consumers. It differs
//! from the stored shape in one place: the time zone is exposed as a parsed
//! [`chrono_tz::Tz`] rather than the raw IANA name.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Version reported before any schedule has been received.
pub const COLD_START_VERSION: &str = "0.0.0";

crate::define_row_id!(i64, RowId);

/// HTTP caching headers of the last schedule response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpHeader {
    pub e_tag: String,
    pub last_modified: String,
}

impl HttpHeader {
    pub fn new(e_tag: impl Into<String>, last_modified: impl Into<String>) -> Self {
        Self {
            e_tag: e_tag.into(),
            last_modified: last_modified.into(),
        }
    }
}

/// Metadata about the event schedule.
///
/// `Meta::default()` is the value produced by an update that carried no data
/// (version `""`). The value observed before any update is
/// [`Meta::cold_start`] (version `"0.0.0"`). Both sentinels are kept distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub num_days: i32,
    pub version: String,
    pub time_zone_id: Option<Tz>,
    pub title: String,
    pub subtitle: String,
    pub http_header: HttpHeader,
}

impl Meta {
    /// In-memory default held until the first successful update.
    pub fn cold_start() -> Self {
        Self {
            version: COLD_START_VERSION.to_string(),
            ..Default::default()
        }
    }
}
