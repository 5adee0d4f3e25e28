//! Error types for sl-signal.

use thiserror::Error;

/// Errors raised while loading the target catalog.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error: {0}")]
    Parse(String),
}

/// Alias for `Result<T, SignalError>`.
pub type SignalResult<T> = Result<T, SignalError>;
