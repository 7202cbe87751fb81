//! Bounded generation history.

use crate::store::{KeyValueStore, KeyValueStoreExt};
use qrkit_core::{HistoryId, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key holding the history list.
pub const HISTORY_KEY: &str = "qr-history";

/// Maximum number of entries kept. The oldest is evicted first.
pub const HISTORY_CAPACITY: usize = 10;

/// One generated QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique identifier derived from the creation time
    pub id: HistoryId,
    /// Sanitized content the code was generated from
    pub content: String,
    /// Display name of the template used
    pub template_name: String,
    /// Creation time (epoch milliseconds on disk)
    pub timestamp: Timestamp,
    /// Rendered image, as a data URI
    pub qr_image_ref: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        content: impl Into<String>,
        template_name: impl Into<String>,
        qr_image_ref: impl Into<String>,
    ) -> Self {
        let timestamp = Timestamp::now();
        Self {
            id: HistoryId::generate_at(timestamp),
            content: content.into(),
            template_name: template_name.into(),
            timestamp,
            qr_image_ref: qr_image_ref.into(),
        }
    }
}

/// Newest-first history list persisted under [`HISTORY_KEY`].
///
/// Every mutation reads the current list, changes it and writes the whole
/// list back.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").finish_non_exhaustive()
    }
}

impl HistoryStore {
    /// Create a history over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All entries, newest first, at most [`HISTORY_CAPACITY`]. An
    /// unreadable list reads as empty.
    #[must_use]
    pub fn list(&self) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self.store.get(HISTORY_KEY, Vec::new());
        entries.truncate(HISTORY_CAPACITY);
        entries
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &HistoryId) -> Option<HistoryEntry> {
        self.list().into_iter().find(|entry| &entry.id == id)
    }

    /// Prepend `entry`, evicting the oldest beyond capacity.
    ///
    /// Returns the list as it now stands in memory, whether or not the write
    /// reached the store.
    pub fn add(&self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        let mut entries = self.list();
        tracing::debug!(id = %entry.id, template = %entry.template_name, "Adding history entry");
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAPACITY);
        self.persist(&entries);
        entries
    }

    /// Remove the entry with `id`. Returns whether the removal was stored.
    pub fn remove(&self, id: &HistoryId) -> bool {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|entry| &entry.id != id);
        if entries.len() == before {
            return false;
        }
        self.persist(&entries)
    }

    /// Drop every entry.
    pub fn clear(&self) -> bool {
        tracing::info!("Clearing history");
        self.store.remove(HISTORY_KEY)
    }

    fn persist(&self, entries: &[HistoryEntry]) -> bool {
        let saved = self.store.set(HISTORY_KEY, entries);
        if !saved {
            tracing::warn!(len = entries.len(), "History was not persisted");
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn history() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryStore::new()))
    }

    fn entry(content: &str) -> HistoryEntry {
        HistoryEntry::new(content, "Plain Text", "data:image/png;base64,AAAA")
    }

    #[test]
    fn test_add_prepends() {
        let history = history();
        history.add(entry("first"));
        history.add(entry("second"));

        let contents: Vec<String> = history.list().into_iter().map(|e| e.content).collect();
        assert_eq!(contents, vec!["second", "first"]);
    }

    #[test]
    fn test_eleventh_entry_evicts_oldest() {
        let history = history();
        for i in 0..HISTORY_CAPACITY {
            history.add(entry(&format!("entry-{i}")));
        }
        assert_eq!(history.list().len(), HISTORY_CAPACITY);

        let after = history.add(entry("newest"));
        assert_eq!(after.len(), HISTORY_CAPACITY);
        assert_eq!(after[0].content, "newest");
        assert!(after.iter().all(|e| e.content != "entry-0"));
        assert_eq!(after[HISTORY_CAPACITY - 1].content, "entry-1");
        assert_eq!(history.list(), after);
    }

    #[test]
    fn test_remove_and_get() {
        let history = history();
        let kept = entry("keep");
        let dropped = entry("drop");
        history.add(kept.clone());
        history.add(dropped.clone());

        assert_eq!(history.get(&dropped.id), Some(dropped.clone()));
        assert!(history.remove(&dropped.id));
        assert!(!history.remove(&dropped.id));
        assert_eq!(history.list(), vec![kept]);
    }

    #[test]
    fn test_clear() {
        let history = history();
        history.add(entry("a"));
        assert!(history.clear());
        assert!(history.list().is_empty());
    }

    #[test]
    fn test_entry_serializes_camel_case_with_millis() {
        let e = HistoryEntry {
            id: HistoryId::new("abc-123").unwrap(),
            content: "hi".to_string(),
            template_name: "Plain Text".to_string(),
            timestamp: Timestamp::from_millis(1_700_000_000_000).unwrap(),
            qr_image_ref: "data:".to_string(),
        };
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "abc-123",
                "content": "hi",
                "templateName": "Plain Text",
                "timestamp": 1_700_000_000_000_i64,
                "qrImageRef": "data:"
            })
        );
    }

    #[test]
    fn test_corrupt_history_reads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set_raw(HISTORY_KEY, &json!("garbage"));
        let history = HistoryStore::new(store);
        assert!(history.list().is_empty());
        assert_eq!(history.add(entry("fresh")).len(), 1);
    }

    /// Serves reads from a seeded store and rejects every write.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
            self.0.get_raw(key)
        }

        fn set_raw(&self, _key: &str, _value: &serde_json::Value) -> bool {
            false
        }

        fn remove(&self, _key: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_remove_reports_rejected_write() {
        let seeded = MemoryStore::new();
        let stored = entry("stuck");
        assert!(seeded.set(HISTORY_KEY, &vec![stored.clone()]));
        let history = HistoryStore::new(Arc::new(ReadOnlyStore(seeded)));

        assert!(!history.remove(&stored.id));
        assert_eq!(history.list(), vec![stored]);
    }

    #[test]
    fn test_oversized_stored_list_is_capped() {
        let store = Arc::new(MemoryStore::new());
        let entries: Vec<HistoryEntry> = (0..15).map(|i| entry(&format!("old-{i}"))).collect();
        assert!(store.set(HISTORY_KEY, &entries));
        let history = HistoryStore::new(store);

        assert_eq!(history.list().len(), HISTORY_CAPACITY);
        assert!(history.remove(&entries[0].id));
        let after = history.list();
        assert_eq!(after.len(), HISTORY_CAPACITY - 1);
        assert_eq!(after[0].content, "old-1");
        assert!(after.iter().all(|e| e.content != "old-10"));
    }

    #[test]
    fn test_added_entry_round_trips_unchanged() {
        let history = history();
        let added = entry("exact");
        history.add(added.clone());
        assert_eq!(history.get(&added.id), Some(added));
    }

    #[test]
    fn test_add_survives_rejected_write() {
        let history = HistoryStore::new(Arc::new(MemoryStore::with_quota(0)));
        let after = history.add(entry("unsaved"));
        assert_eq!(after.len(), 1);
        assert!(history.list().is_empty());
    }
}
