//! Key/value persistence collaborator.
//!
//! Values are stored as `serde_json::Value`. Backends never surface errors to
//! callers: a failed read looks like a missing key and a failed write returns
//! `false` after logging a warning.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Storage interface the history and preference layers are built on.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for `key`.
    fn get_raw(&self, key: &str) -> Option<Value>;

    /// Write `value` under `key`. Returns `false` when the write was rejected.
    fn set_raw(&self, key: &str, value: &Value) -> bool;

    /// Delete `key`. Returns `false` when the write was rejected.
    fn remove(&self, key: &str) -> bool;
}

/// Typed helpers over any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Deserialize the value at `key`, or `default` when it is missing or
    /// does not deserialize as `T`.
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get_raw(key) else {
            return default;
        };
        match serde_json::from_value(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value has unexpected shape, using default");
                default
            }
        }
    }

    /// Serialize and store `value` under `key`.
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_value(value) {
            Ok(raw) => self.set_raw(key, &raw),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize value for storage");
                false
            }
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process store.
///
/// An optional quota caps the number of keys, which lets tests exercise the
/// write-failure path the way a full browser storage area would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Empty store without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store that rejects writes creating more than `max_keys` keys.
    #[must_use]
    pub fn with_quota(max_keys: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(max_keys),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<Value> {
        lock(&self.entries).get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: &Value) -> bool {
        let mut entries = lock(&self.entries);
        if let Some(quota) = self.quota {
            if !entries.contains_key(key) && entries.len() >= quota {
                tracing::warn!(key, quota, "Memory store quota exceeded");
                return false;
            }
        }
        entries.insert(key.to_string(), value.clone());
        true
    }

    fn remove(&self, key: &str) -> bool {
        lock(&self.entries).remove(key);
        true
    }
}

/// Store backed by a single JSON object file.
///
/// The whole file is loaded on open and rewritten on every mutation through a
/// temporary sibling and a rename. A missing or unreadable file opens as an
/// empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened JSON file store");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Map<String, Value> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read store file");
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Store file is not a JSON object, starting empty");
                Map::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Store file is corrupt, starting empty");
                Map::new()
            }
        }
    }

    fn persist(&self, entries: &Map<String, Value>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)
    }

    /// Apply `mutate` to a copy of the map and commit it only if the file
    /// write succeeds.
    fn commit(&self, key: &str, mutate: impl FnOnce(&mut Map<String, Value>)) -> bool {
        let mut entries = lock(&self.entries);
        let mut next = entries.clone();
        mutate(&mut next);

        match self.persist(&next) {
            Ok(()) => {
                *entries = next;
                true
            }
            Err(e) => {
                tracing::warn!(
                    key,
                    path = %self.path.display(),
                    error = %e,
                    "Failed to write store file"
                );
                false
            }
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Option<Value> {
        lock(&self.entries).get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: &Value) -> bool {
        self.commit(key, |entries| {
            entries.insert(key.to_string(), value.clone());
        })
    }

    fn remove(&self, key: &str) -> bool {
        self.commit(key, |entries| {
            entries.remove(key);
        })
    }
}
