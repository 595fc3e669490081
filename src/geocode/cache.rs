// src/geocode/cache.rs
//
// File-backed id -> coordinates cache for geocoding results. The file is the
// sole persistent store; a corrupt file degrades to an empty or partial cache,
// never a crash. Concurrent writers are not supported.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedCoordinates {
    pub lat: f64,
    pub lon: f64,
}

pub struct GeocodeCache {
    path: PathBuf,
    entries: BTreeMap<String, CachedCoordinates>,
}

impl GeocodeCache {
    /// Load the cache from `path`. A missing file is an empty cache; so is a
    /// file that fails to read or parse. Entries whose lat/lon are missing or
    /// non-numeric are dropped on the way in, which also covers eviction:
    /// a malformed entry is simply absent and gets re-resolved.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self { path, entries }
    }

    pub fn get(&self, property_id: &str) -> Option<CachedCoordinates> {
        self.entries.get(property_id).copied()
    }

    /// Insert one entry and persist. Persisting is read-merge-write: the file
    /// is re-read first so entries appended since load are kept rather than
    /// clobbered. A failed write is logged and the run continues.
    pub fn insert(&mut self, property_id: &str, coordinates: CachedCoordinates) {
        let mut merged = read_entries(&self.path);
        merged.insert(property_id.to_string(), coordinates);
        self.entries = merged;
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("failed to create cache directory: {e}");
                return;
            }
        }

        let file = match fs::File::create(&self.path) {
            Ok(file) => file,
            Err(e) => {
                error!("failed to write cache file {}: {e}", self.path.display());
                return;
            }
        };

        if let Err(e) = serde_json::to_writer_pretty(file, &self.entries) {
            error!("failed to write cache file {}: {e}", self.path.display());
        }
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, CachedCoordinates> {
    if !path.exists() {
        return BTreeMap::new();
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("cache file {} unreadable, using empty cache: {e}", path.display());
            return BTreeMap::new();
        }
    };

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            warn!("cache file {} is corrupt, using empty cache: {e}", path.display());
            return BTreeMap::new();
        }
    };

    let Some(object) = value.as_object() else {
        warn!(
            "cache file {} does not hold an object, using empty cache",
            path.display()
        );
        return BTreeMap::new();
    };

    let mut entries = BTreeMap::new();
    for (property_id, entry) in object {
        let lat = entry.get("lat").and_then(Value::as_f64);
        let lon = entry.get("lon").and_then(Value::as_f64);

        match (lat, lon) {
            (Some(lat), Some(lon)) => {
                entries.insert(property_id.clone(), CachedCoordinates { lat, lon });
            }
            _ => warn!("dropping malformed cache entry for id {property_id}"),
        }
    }
    entries
}
