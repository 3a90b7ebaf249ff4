use serde::{Deserialize, Serialize};

/// Caching headers as received with a schedule response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkHttpHeader {
    pub e_tag: Option<String>,
    pub last_modified: Option<String>,
}

/// Meta information as parsed from a fetched schedule.
///
/// Every field may be missing on the wire. Defaults are applied when the value
/// is translated into the stored shape, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkMeta {
    pub num_days: Option<i32>,
    pub version: Option<String>,
    pub time_zone_name: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub http_header: NetworkHttpHeader,
}

impl NetworkMeta {
    /// Parse the JSON document handed over by the fetch collaborator.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
