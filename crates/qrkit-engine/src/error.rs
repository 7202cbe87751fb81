//! Error types for QR encoding, decoding and generation.

use thiserror::Error;

/// Errors from the QR encode and decode collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The payload does not fit any QR version at the chosen level
    #[error("Payload cannot be encoded as a QR symbol: {0}")]
    Encode(String),

    /// An encode option is out of range
    #[error("Invalid encode option {field}: {reason}")]
    InvalidOption {
        /// Option name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// PNG encoding failed
    #[error("Failed to write image: {0}")]
    ImageWrite(String),

    /// Input bytes are not a readable image
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// The frame holds no detectable symbol
    #[error("No QR code found in frame")]
    NoCodeFound,

    /// A symbol was found but its data could not be recovered
    #[error("QR code detected but could not be decoded: {0}")]
    Decode(String),
}

/// Errors surfaced by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Input failed validation; carries the user-facing message.
    #[error("{0}")]
    Validation(String),

    /// Encoding kept failing after every retry.
    #[error("QR generation failed: {0}")]
    Encode(#[source] EngineError),
}

/// Result type alias using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<EngineError> for qrkit_core::QrkitError {
    fn from(err: EngineError) -> Self {
        qrkit_core::QrkitError::Engine(err.to_string())
    }
}

impl From<GenerateError> for qrkit_core::QrkitError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Validation(message) => qrkit_core::QrkitError::Validation(message),
            GenerateError::Encode(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_error_keeps_source() {
        use std::error::Error as _;

        let err = GenerateError::Encode(EngineError::Encode("data too long".to_string()));
        assert_eq!(err.to_string(), "QR generation failed: Payload cannot be encoded as a QR symbol: data too long");
        assert!(err.source().is_some());

        let err = GenerateError::Validation("Invalid URL format".to_string());
        assert_eq!(err.to_string(), "Invalid URL format");
    }

    #[test]
    fn test_into_workspace_error() {
        let err: qrkit_core::QrkitError = GenerateError::Validation("Invalid URL format".to_string()).into();
        assert!(matches!(err, qrkit_core::QrkitError::Validation(_)));

        let err: qrkit_core::QrkitError = EngineError::NoCodeFound.into();
        assert!(matches!(err, qrkit_core::QrkitError::Engine(_)));
    }
}
