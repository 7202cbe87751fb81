//! QRKit Core - Foundation crate for the QRKit workspace.
//!
//! This crate provides the shared error type, configuration management and
//! identifier newtypes that the content, history, engine and diagnostics
//! crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`HistoryId`, `Timestamp`)
//!
//! # Example
//!
//! ```rust
//! use qrkit_core::{AppConfig, HistoryId};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.generator.max_attempts, 3);
//!
//! let id = HistoryId::generate();
//! assert!(!id.as_str().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, DiagnosticsConfig, GeneratorConfig, HistoryConfig, MAX_QR_MARGIN, MAX_QR_WIDTH,
    MIN_QR_WIDTH,
};
pub use error::{ConfigError, ConfigResult, QrkitError, Result};
pub use types::{HistoryId, Timestamp};
