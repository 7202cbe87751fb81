//! QRKit History - Generation history and user preferences.
//!
//! Persistence is an injected collaborator: everything here talks to a
//! [`KeyValueStore`], which never fails loudly. Reads fall back to defaults
//! and writes report `false` when the backing store rejects them.
//!
//! # Modules
//!
//! - [`store`] - the `KeyValueStore` trait with memory and JSON-file backends
//! - [`history`] - bounded, newest-first list of generated codes
//! - [`preferences`] - persisted QR colour choices
//!
//! # Example
//!
//! ```rust
//! use qrkit_history::{HistoryEntry, HistoryStore, MemoryStore};
//! use std::sync::Arc;
//!
//! let history = HistoryStore::new(Arc::new(MemoryStore::new()));
//! history.add(HistoryEntry::new("hello", "Plain Text", "data:image/png;base64,"));
//! assert_eq!(history.list().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod history;
pub mod preferences;
pub mod store;

pub use error::{HistoryError, Result};
pub use history::{HistoryEntry, HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};
pub use preferences::{ColorPair, HexColor, Preferences, DARK_COLOR_KEY, LIGHT_COLOR_KEY};
pub use store::{JsonFileStore, KeyValueStore, KeyValueStoreExt, MemoryStore};
