//! QRKit Content - Sanitization, validation and payload formatting.
//!
//! This crate turns raw user input into QR payload strings. Each supported
//! content class carries its own sanitize / validate / format triple:
//!
//! - [`sanitize`] - strips unsafe or malformed characters per class
//! - [`validation`] - generic constraints plus the per-class rules in [`rules`]
//! - [`template`] - the static template catalogue and payload formatter
//!
//! The crate performs no I/O; persistence and encoding live elsewhere.
//!
//! # Example
//!
//! ```rust
//! use qrkit_content::{ContentClass, ValidationOptions};
//!
//! let options = ValidationOptions::new().required(true);
//! let result = ContentClass::Wifi.validate("HomeNet,hunter22,wpa2", &options);
//! assert!(result.is_valid());
//!
//! let payload = ContentClass::Wifi.format(result.sanitized_value().unwrap_or_default());
//! assert_eq!(payload, "WIFI:T:wpa2;S:HomeNet;P:hunter22;;");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod class;
pub mod rules;
pub mod sanitize;
pub mod template;
pub mod validation;

// Re-export commonly used types
pub use class::{ContentClass, ParseContentClassError};
pub use template::{format, QrTemplate, TemplateSelection, TEMPLATES};
pub use validation::{validate, validate_as, CustomValidator, ValidationOptions, ValidationResult};
