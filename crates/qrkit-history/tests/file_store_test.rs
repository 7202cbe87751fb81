//! History and preferences persisted through the JSON file store.

use qrkit_history::{
    HexColor, HistoryEntry, HistoryStore, JsonFileStore, KeyValueStore, Preferences,
    HISTORY_CAPACITY, HISTORY_KEY,
};
use std::sync::Arc;
use tempfile::TempDir;

fn open(dir: &TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(JsonFileStore::open(dir.path().join("store.json")))
}

#[test]
fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let history = HistoryStore::new(open(&dir));
    for i in 0..=HISTORY_CAPACITY {
        history.add(HistoryEntry::new(
            format!("item {i}"),
            "Plain Text",
            "data:image/png;base64,",
        ));
    }

    let reopened = HistoryStore::new(open(&dir));
    let entries = reopened.list();
    assert_eq!(entries.len(), HISTORY_CAPACITY);
    assert_eq!(entries[0].content, format!("item {HISTORY_CAPACITY}"));
    assert!(entries.iter().all(|e| e.content != "item 0"));
}

#[test]
fn test_history_file_layout() {
    let dir = TempDir::new().unwrap();
    let history = HistoryStore::new(open(&dir));
    history.add(HistoryEntry::new("hello", "Plain Text", "data:"));

    let raw = std::fs::read_to_string(dir.path().join("store.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let list = value[HISTORY_KEY].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["templateName"], "Plain Text");
    assert!(list[0]["timestamp"].is_i64());
}

#[test]
fn test_preferences_share_store_with_history() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let prefs = Preferences::new(Arc::clone(&store));
    let history = HistoryStore::new(store);
    assert!(prefs.set_light(&HexColor::new("#fafafa").unwrap()));
    history.add(HistoryEntry::new("x", "Plain Text", "data:"));

    let reopened = Preferences::new(open(&dir));
    assert_eq!(reopened.colors().light.as_str(), "#fafafa");
    assert_eq!(HistoryStore::new(open(&dir)).list().len(), 1);
}
