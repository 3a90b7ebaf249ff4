//! Translation between the network, stored and application meta shapes.
//!
//! These are pure functions. Defaults are applied when leaving the network
//! shape; the time-zone name is only parsed when entering the application
//! shape.

use chrono_tz::Tz;

use crate::db::models::{StoredHttpHeader, StoredMeta};
use crate::models::{HttpHeader, Meta};
use crate::network::NetworkMeta;

/// Fill every absent network field with its default.
///
/// The time-zone name is copied as-is, without validation.
pub fn network_to_stored(meta: &NetworkMeta) -> StoredMeta {
    StoredMeta {
        num_days: meta.num_days.unwrap_or(0),
        version: meta.version.clone().unwrap_or_default(),
        time_zone_name: meta.time_zone_name.clone(),
        title: meta.title.clone().unwrap_or_default(),
        subtitle: meta.subtitle.clone().unwrap_or_default(),
        http_header: StoredHttpHeader {
            e_tag: meta.http_header.e_tag.clone().unwrap_or_default(),
            last_modified: meta.http_header.last_modified.clone().unwrap_or_default(),
        },
    }
}

/// Copy the stored snapshot into the application shape.
///
/// A missing or unparsable time-zone name yields `time_zone_id: None`.
pub fn stored_to_domain(meta: &StoredMeta) -> Meta {
    Meta {
        num_days: meta.num_days,
        version: meta.version.clone(),
        time_zone_id: meta.time_zone_name.as_deref().and_then(parse_time_zone),
        title: meta.title.clone(),
        subtitle: meta.subtitle.clone(),
        http_header: HttpHeader {
            e_tag: meta.http_header.e_tag.clone(),
            last_modified: meta.http_header.last_modified.clone(),
        },
    }
}

/// Parse an IANA zone name, logging and discarding failures.
pub fn parse_time_zone(name: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(e) => {
            log::warn!("Ignoring unparsable time zone name {:?}: {}", name, e);
            None
        }
    }
}

impl From<&NetworkMeta> for StoredMeta {
    fn from(meta: &NetworkMeta) -> Self {
        network_to_stored(meta)
    }
}

impl From<&StoredMeta> for Meta {
    fn from(meta: &StoredMeta) -> Self {
        stored_to_domain(meta)
    }
}
