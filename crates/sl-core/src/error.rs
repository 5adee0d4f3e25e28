//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` impls or keep them separate; both patterns are
//! acceptable — prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::{DroneId, TargetId};

/// The top-level error type for `sl-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("drone {0} not found")]
    DroneNotFound(DroneId),

    #[error("target {0} not found")]
    TargetNotFound(TargetId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `sl-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
