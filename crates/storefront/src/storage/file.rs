//! Durable file-backed storage backend.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{error, warn};

use super::KeyValueStore;

/// Slot store persisted as one JSON object on disk.
///
/// Every access re-reads the file and every write rewrites it whole, so
/// two processes sharing the path see last-writer-wins semantics, the
/// same contract the cart has in web local storage. An unreadable or
/// corrupt file behaves as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store persisted at `path`. The file is created on first
    /// write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_slots(&self) -> HashMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                error!(error = %err, path = %self.path.display(), "failed to read store file");
                return HashMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, path = %self.path.display(), "discarding corrupt store file");
            HashMap::new()
        })
    }

    fn write_slots(&self, slots: &HashMap<String, String>) {
        match serde_json::to_string_pretty(slots) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    error!(error = %err, path = %self.path.display(), "failed to write store file");
                }
            }
            Err(err) => error!(error = %err, "failed to serialize store slots"),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_slots().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut slots = self.read_slots();
        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots);
    }

    fn remove(&self, key: &str) {
        let mut slots = self.read_slots();
        if slots.remove(key).is_some() {
            self.write_slots(&slots);
        }
    }
}
