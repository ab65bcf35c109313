use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout of the geocode cache.
///
/// Entries are kept as raw JSON values and decoded one by one,
/// so a single entry of an unknown shape never spoils the whole file.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub entries: BTreeMap<String, Value>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CacheEntry {
    Resolved {
        lat: f64,
        lng: f64,
    },
    Unresolvable,
    #[serde(other)]
    Unknown,
}
