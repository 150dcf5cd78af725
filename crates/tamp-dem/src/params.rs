//! Engine construction parameters.

use tamp_math::Vec3;

use crate::snapshot::SnapshotFormat;

/// Spring-dashpot coefficients for one contact family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactModel {
    /// Normal stiffness.
    pub kn: f64,
    /// Normal damping, per unit effective mass.
    pub gn: f64,
    /// Tangential damping, per unit effective mass.
    pub gt: f64,
    /// Static friction coefficient capping the tangential force.
    pub mu: f64,
}

/// Everything the engine needs before particles are loaded.
#[derive(Debug, Clone)]
pub struct DemParams {
    pub sphere_radius: f64,
    pub sphere_density: f64,
    /// Full extents of the fixed simulation box, centered on the origin.
    pub domain: Vec3,
    pub gravity: Vec3,
    /// Sphere-to-sphere contacts.
    pub sphere: ContactModel,
    /// Sphere-to-wall contacts (domain walls and boundaries).
    pub wall: ContactModel,
    /// Cohesive pull between touching spheres, in units of sphere weight.
    pub cohesion_ratio: f64,
    /// Adhesive pull toward touching walls, in units of sphere weight.
    pub adhesion_ratio_s2w: f64,
    /// Internal integration step.
    pub step_size: f64,
    pub snapshot_format: SnapshotFormat,
}

impl DemParams {
    pub fn sphere_mass(&self) -> f64 {
        self.sphere_density * 4.0 / 3.0 * std::f64::consts::PI * self.sphere_radius.powi(3)
    }
}
