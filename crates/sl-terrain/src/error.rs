//! Error types for sl-terrain.

use thiserror::Error;

/// Errors raised while loading raster layers.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("grid header error: {0}")]
    Header(String),

    #[error("unparseable grid value {0:?}")]
    Value(String),

    #[error("grid declares {expected} cells but contains {got}")]
    CellCount { expected: usize, got: usize },
}

/// Alias for `Result<T, TerrainError>`.
pub type TerrainResult<T> = Result<T, TerrainError>;
