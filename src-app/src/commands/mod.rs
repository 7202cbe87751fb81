//! Command handlers.
//!
//! Each handler writes its output to the given writer so it can be driven
//! from tests as well as from the binary.

pub mod content;
pub mod diagnose;
pub mod history;
