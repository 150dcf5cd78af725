//! tamp: phased granular compression driver.
//!
//! Builds a non-overlapping initial packing, registers a moving boundary
//! whose kinematics are armed only once settling is over, and steps a
//! [`GranularEngine`] at a fixed frame rate, writing one snapshot and one
//! diagnostic line per frame. Re-exports the core types of the sub-crates.

pub mod driver;
pub mod error;
pub mod frame;
pub mod phase;
pub mod scenario;

pub use driver::{DriverOptions, Setup, SimulationDriver, snapshot_path, tick_count};
pub use error::{DriverError, Result};
pub use frame::{FrameLog, FrameRecord, FrameStats};
pub use phase::{ArmingPolicy, Phase, PhaseController};

pub use tamp_dem::{self, DemSystem};
pub use tamp_engine::{
    self, BoundaryHandle, BoundaryKinematics, BoundarySpec, EngineError, Extreme,
    GranularEngine, KinematicsState, Particle,
};
pub use tamp_format::{self, SimParams};
pub use tamp_math::{self, Axis, ForceScale, Vec3};
pub use tamp_sampler::{self, BoxFill, PackingSpec};
