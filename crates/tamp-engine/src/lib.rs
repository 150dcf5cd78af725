//! Engine capability interface for the tamp driver.
//!
//! The driver never integrates particles itself. It talks to a granular
//! engine through [`GranularEngine`]: load particles once, create
//! boundaries, register their kinematics, advance by a fixed step, and query
//! aggregate results. Anything else an engine can do is out of reach of the
//! driver.

pub mod error;
pub mod kinematics;

pub use error::{EngineError, Result};
pub use kinematics::{BoundaryKinematics, KinematicsState};

use core::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tamp_math::{Axis, Vec3};

/// Initial state of one sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    pub fn at_rest(position: Vec3) -> Self {
        Self::new(position, Vec3::zeros())
    }

    /// Pair positions with velocities; missing velocities are zero.
    pub fn zip(positions: &[Vec3], velocities: &[Vec3]) -> Vec<Particle> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let v = velocities.get(i).copied().unwrap_or_else(Vec3::zeros);
                Particle::new(*p, v)
            })
            .collect()
    }
}

/// Opaque boundary identifier handed out by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryHandle(pub usize);

impl fmt::Display for BoundaryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundaryHandle({})", self.0)
    }
}

/// Boundary geometry at its rest position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoundarySpec {
    /// Half-space wall. Particles live on the side the normal points to.
    Plane {
        position: Vec3,
        normal: Vec3,
        track_forces: bool,
    },
    /// Vertical cylinder wall; particles live inside.
    CylinderZ {
        center: Vec3,
        radius: f64,
        track_forces: bool,
    },
}

impl BoundarySpec {
    /// Reference point that kinematic offsets are applied to.
    pub fn rest_position(&self) -> Vec3 {
        match self {
            BoundarySpec::Plane { position, .. } => *position,
            BoundarySpec::CylinderZ { center, .. } => *center,
        }
    }

    pub fn tracks_forces(&self) -> bool {
        match self {
            BoundarySpec::Plane { track_forces, .. }
            | BoundarySpec::CylinderZ { track_forces, .. } => *track_forces,
        }
    }
}

/// Which end of the particle distribution to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

/// Narrow set of engine operations the driver depends on.
///
/// Calls are synchronous: `advance` returns only once the step is complete,
/// and queries observe the state after the most recent `advance`.
pub trait GranularEngine {
    /// Hand the initial packing to the engine. Called once, before
    /// [`GranularEngine::initialize`].
    fn load_particles(&mut self, particles: &[Particle]) -> Result<()>;

    /// Create a boundary at its rest position.
    fn create_boundary(&mut self, spec: BoundarySpec) -> Result<BoundaryHandle>;

    /// Register the motion of a boundary. The engine evaluates it once per
    /// internal step at the current simulation time.
    fn set_boundary_kinematics(
        &mut self,
        boundary: BoundaryHandle,
        kinematics: BoundaryKinematics,
    ) -> Result<()>;

    /// Mutable access to registered kinematics, used to arm them in place.
    fn boundary_kinematics_mut(
        &mut self,
        boundary: BoundaryHandle,
    ) -> Result<&mut BoundaryKinematics>;

    /// Finalize setup. No particles or boundaries are added afterwards.
    fn initialize(&mut self) -> Result<()>;

    /// Advance the simulation by `dt`.
    fn advance(&mut self, dt: f64) -> Result<()>;

    /// Current simulation time.
    fn time(&self) -> f64;

    fn num_particles(&self) -> usize;

    /// Extreme particle-center coordinate along `axis`, if any particles exist.
    fn particle_extreme(&self, axis: Axis, which: Extreme) -> Option<f64>;

    /// Number of active particle-particle contacts.
    fn contact_count(&self) -> usize;

    /// Current position of a boundary's reference point.
    fn boundary_position(&self, boundary: BoundaryHandle) -> Result<Vec3>;

    /// Force exerted by the particles on a boundary, in engine units.
    fn boundary_reaction_force(&self, boundary: BoundaryHandle) -> Result<Vec3>;

    /// Write the particle state to `path`. The file format (and any
    /// extension appended to `path`) belongs to the engine.
    fn write_snapshot(&self, path: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_fills_missing_velocities() {
        let pos = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let vel = vec![Vec3::new(0.0, 1.0, 0.0)];
        let particles = Particle::zip(&pos, &vel);
        assert_eq!(particles.len(), 2);
        assert_eq!(particles[0].velocity, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(particles[1].velocity, Vec3::zeros());
    }

    #[test]
    fn test_rest_position() {
        let plane = BoundarySpec::Plane {
            position: Vec3::new(0.0, 0.0, 10.0),
            normal: Vec3::new(0.0, 0.0, -1.0),
            track_forces: true,
        };
        assert_eq!(plane.rest_position(), Vec3::new(0.0, 0.0, 10.0));
        assert!(plane.tracks_forces());

        let cyl = BoundarySpec::CylinderZ {
            center: Vec3::zeros(),
            radius: 5.0,
            track_forces: false,
        };
        assert_eq!(cyl.rest_position(), Vec3::zeros());
        assert!(!cyl.tracks_forces());
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(BoundaryHandle(3).to_string(), "BoundaryHandle(3)");
    }
}
