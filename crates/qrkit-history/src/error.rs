//! History and preference error types.

use thiserror::Error;

/// Errors raised by history and preference operations.
///
/// Storage failures are not errors here: the store reports them as `false`
/// or a default value. Only caller input is rejected.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A colour string is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[error("invalid colour '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
