//! Diagnostic error types.

use crate::check::{CheckKind, DiagnosticStatus};
use thiserror::Error;

/// Errors raised while probing the environment or loading a report.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// A probe blew up instead of answering; the battery records it as failed.
    #[error("{0}")]
    Probe(String),

    /// A result was resolved twice in one run
    #[error("Check {check} already resolved as {status}")]
    AlreadyResolved {
        /// Check whose result was resolved
        check: CheckKind,
        /// Status it already holds
        status: DiagnosticStatus,
    },

    /// A result was resolved to `Pending`
    #[error("Cannot resolve {check} to a non-terminal status")]
    NotTerminal {
        /// Check whose result was resolved
        check: CheckKind,
    },

    /// Report JSON did not parse
    #[error("Invalid environment report: {0}")]
    Report(#[from] serde_json::Error),

    /// Report file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using `DiagnosticError`.
pub type Result<T> = std::result::Result<T, DiagnosticError>;

impl From<DiagnosticError> for qrkit_core::QrkitError {
    fn from(err: DiagnosticError) -> Self {
        qrkit_core::QrkitError::Diagnostic(err.to_string())
    }
}
