//! Error types for the driver.

use crate::phase::Phase;
use tamp_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("packing produced no particles; check radius, spacing and domain extents")]
    EmptyPacking,

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid frame cadence: {0}")]
    InvalidCadence(String),

    #[error("cannot move from {from:?} to {to:?}")]
    PhaseOrder { from: Phase, to: Phase },
}

pub type Result<T> = std::result::Result<T, DriverError>;
