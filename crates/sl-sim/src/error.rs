use sl_core::GeoPoint;
use sl_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("drone {name:?} starts at {position}, outside the permitted area")]
    StartOutsidePerimeter { name: String, position: GeoPoint },

    #[error("{what} length {got} does not match fleet size {expected}")]
    FleetCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("fleet parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
