//! Zone database: the YAML file of zones and their RRSets.
//!
//! ```yaml
//! zone:
//!   example.com:
//!     - host: ""
//!       type: A
//!       ttl: 300
//!       values: ["192.0.2.1"]
//!     - host: www
//!       type: CNAME
//!       values: ["example.com."]
//! ```
//!
//! The database is loaded fresh for every query and dropped afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::record::RecordKind;

/// A named record set inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSet {
    /// Zone-relative host label, empty for the apex.
    #[serde(default)]
    pub host: String,

    #[serde(rename = "type")]
    pub kind: RecordKind,

    /// Seconds; zero or negative means the default TTL.
    #[serde(default)]
    pub ttl: i64,

    #[serde(default)]
    pub values: Vec<String>,
}

/// On-disk layout of the database file.
#[derive(Debug, Deserialize)]
struct DatabaseFile {
    #[serde(default)]
    zone: Option<serde_yaml::Mapping>,
}

/// All zones, keyed by lowercase name without a trailing dot.
#[derive(Debug, Clone, Default)]
pub struct ZoneDatabase {
    zones: HashMap<String, Vec<RRSet>>,
}

impl ZoneDatabase {
    /// Read and parse the database file at `path`.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a database from YAML text.
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        let file: DatabaseFile = serde_yaml::from_str(content)
            .map_err(|e| crate::SrvError::Database(e.to_string()))?;

        let mut db = Self::default();
        for (key, value) in file.zone.unwrap_or_default() {
            let name = key
                .as_str()
                .ok_or_else(|| crate::SrvError::Database(format!("zone name {key:?} is not a string")))?
                .to_string();
            let rrsets: Vec<RRSet> = serde_yaml::from_value(value)
                .map_err(|e| crate::SrvError::Database(format!("zone {name}: {e}")))?;
            db.insert(&name, rrsets);
        }
        Ok(db)
    }

    /// Add or replace a zone. Later inserts of the same name win.
    pub fn insert(&mut self, name: &str, rrsets: Vec<RRSet>) {
        let rrsets = rrsets
            .into_iter()
            .map(|mut rrset| {
                rrset.host = normalize_name(&rrset.host);
                rrset
            })
            .collect();
        self.zones.insert(normalize_name(name), rrsets);
    }

    /// RRSets of the zone called `name`, if present.
    pub fn get(&self, name: &str) -> Option<&[RRSet]> {
        self.zones.get(name).map(Vec::as_slice)
    }

    /// Stored zone name and RRSets for `name`, if present.
    pub fn entry(&self, name: &str) -> Option<(&str, &[RRSet])> {
        self.zones
            .get_key_value(name)
            .map(|(key, rrsets)| (key.as_str(), rrsets.as_slice()))
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones sorted by name.
    pub fn zones(&self) -> Vec<(&str, &[RRSet])> {
        let mut zones: Vec<_> = self
            .zones
            .iter()
            .map(|(name, rrsets)| (name.as_str(), rrsets.as_slice()))
            .collect();
        zones.sort_by(|a, b| a.0.cmp(b.0));
        zones
    }
}

/// Lowercase a name and strip any trailing dot.
pub fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
