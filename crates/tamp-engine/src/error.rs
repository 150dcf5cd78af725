//! Error types reported by engine implementations.

use thiserror::Error;

use crate::BoundaryHandle;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown boundary: {0}")]
    UnknownBoundary(BoundaryHandle),

    #[error("no particles loaded")]
    NoParticles,

    #[error("engine used before initialize()")]
    NotInitialized,

    #[error("invalid step: {0}")]
    InvalidStep(f64),

    #[error("particle state diverged at t = {time}")]
    Diverged { time: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
