//! Reference granular engine for tamp.
//!
//! A small discrete-element solver: equal spheres, linear spring-dashpot
//! normal contacts, Coulomb-capped viscous friction, constant cohesion and
//! wall adhesion, semi-implicit Euler at a fixed internal step. It exists so
//! the driver can run end to end; any engine implementing
//! [`tamp_engine::GranularEngine`] can replace it.

mod grid;
pub mod params;
pub mod snapshot;
pub mod system;

pub use params::{ContactModel, DemParams};
pub use snapshot::SnapshotFormat;
pub use system::DemSystem;
