//! QRKit Engine - QR generation and scanning.
//!
//! Wraps third-party QR encode and decode behind small traits and drives a
//! generation end to end with bounded retries.
//!
//! # Modules
//!
//! - [`retry`] - exponential backoff around fallible async operations
//! - [`encode`] - payload to PNG data URI
//! - [`decode`] - greyscale frames to payload strings
//! - [`pipeline`] - validate, format, encode and record in history
//!
//! # Example
//!
//! ```rust,no_run
//! use qrkit_content::ContentClass;
//! use qrkit_engine::{EncodeOptions, Generator, QrCodeEngine};
//! use qrkit_history::{HistoryStore, MemoryStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), qrkit_engine::GenerateError> {
//! let history = HistoryStore::new(Arc::new(MemoryStore::new()));
//! let generator = Generator::new(Arc::new(QrCodeEngine::new()), history);
//! let generated = generator
//!     .generate(ContentClass::Url, "example.com", &EncodeOptions::default())
//!     .await?;
//! println!("{}", generated.image);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod decode;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod retry;

pub use decode::{decode_image_bytes, load_frame, QrDecoder, RqrrDecoder, Scanner};
pub use encode::{
    data_uri_bytes, EncodeOptions, ErrorCorrection, QrCodeEngine, QrEncoder, MAX_IMAGE_EDGE,
    PNG_DATA_URI_PREFIX,
};
pub use error::{EngineError, GenerateError, Result};
pub use pipeline::{Generated, Generator};
pub use retry::{with_retry, with_retry_notify, RetryPolicy};
