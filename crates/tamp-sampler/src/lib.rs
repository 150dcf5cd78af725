//! Packing samplers for granular initial conditions.
//!
//! Every sampler returns sphere centers whose pairwise distance is at least
//! the requested spacing and which lie inside the container shrunk by one
//! particle radius. Invalid inputs (non-positive spacing, a domain that
//! cannot hold a single particle) produce an empty vector; callers must treat
//! that as a configuration error.

pub mod boxfill;
pub mod hex;
pub mod layers;
pub mod velocity;

pub use boxfill::{BoxFill, box_fill};
pub use hex::HexSampler;
pub use layers::{cylinder_layers, layer_heights};
pub use velocity::settling_velocities;

use serde::{Deserialize, Serialize};
use tamp_math::Vec3;

/// Container shape to fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Vertical cylinder around the Z axis through `center` (x, y), filled
    /// between `z_min` and `z_max`.
    Cylinder {
        center: Vec3,
        radius: f64,
        z_min: f64,
        z_max: f64,
    },
    /// Axis-aligned box of container half extents `half_dims`. Sphere
    /// centers keep `max(clearance, particle_radius)` away from every face.
    Box {
        center: Vec3,
        half_dims: Vec3,
        clearance: f64,
    },
}

/// Full description of an initial packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingSpec {
    pub domain: Domain,
    /// Sphere radius.
    pub particle_radius: f64,
    /// Minimum center-to-center distance.
    pub spacing: f64,
    /// Fill strategy for box domains (ignored for cylinders).
    #[serde(default)]
    pub fill: BoxFill,
}

impl PackingSpec {
    /// Cylinder filled with hexagonal layers at `packing_constant · r`.
    pub fn cylinder(
        center: Vec3,
        radius: f64,
        z_min: f64,
        z_max: f64,
        r: f64,
        packing_constant: f64,
    ) -> Self {
        Self {
            domain: Domain::Cylinder {
                center,
                radius,
                z_min,
                z_max,
            },
            particle_radius: r,
            spacing: packing_constant * r,
            fill: BoxFill::Lattice,
        }
    }

    /// Box filled at `2r · packing_factor`, centers at least `clearance`
    /// (and never less than `r`) from the walls.
    pub fn block(
        center: Vec3,
        half_dims: Vec3,
        clearance: f64,
        r: f64,
        packing_factor: f64,
        fill: BoxFill,
    ) -> Self {
        Self {
            domain: Domain::Box {
                center,
                half_dims,
                clearance,
            },
            particle_radius: r,
            spacing: 2.0 * r * packing_factor,
            fill,
        }
    }

    /// Generate the sphere centers.
    pub fn sample(&self) -> Vec<Vec3> {
        let points = match &self.domain {
            Domain::Cylinder {
                center,
                radius,
                z_min,
                z_max,
            } => cylinder_layers(
                center,
                *radius,
                *z_min,
                *z_max,
                self.particle_radius,
                self.spacing,
            ),
            Domain::Box {
                center,
                half_dims,
                clearance,
            } => {
                let margin = clearance.max(self.particle_radius);
                let inner = half_dims.map(|h| h - margin);
                box_fill(center, &inner, self.spacing, &self.fill)
            }
        };
        if points.is_empty() {
            log::warn!("packing produced no particles: {:?}", self);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_spec_spacing() {
        let spec = PackingSpec::cylinder(Vec3::zeros(), 5.0, -10.0, 10.0, 0.1, 2.1);
        assert!((spec.spacing - 0.21).abs() < 1e-12);
    }

    #[test]
    fn test_block_spec_spacing() {
        let spec = PackingSpec::block(
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            0.0,
            0.5,
            1.05,
            BoxFill::Lattice,
        );
        assert!((spec.spacing - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_block_keeps_one_radius_from_walls() {
        // radius larger than the requested clearance
        let half = Vec3::new(4.0, 4.0, 3.0);
        let spec = PackingSpec::block(Vec3::zeros(), half, 0.5, 1.0, 1.05, BoxFill::Lattice);
        let pts = spec.sample();
        assert!(!pts.is_empty());
        for p in &pts {
            for a in 0..3 {
                assert!(p[a].abs() + 1.0 <= half[a] + 1e-12, "{p:?}");
            }
        }
    }

    #[test]
    fn test_block_honors_larger_clearance() {
        let half = Vec3::new(4.0, 4.0, 3.0);
        let spec = PackingSpec::block(Vec3::zeros(), half, 1.5, 0.2, 1.05, BoxFill::Lattice);
        for p in &spec.sample() {
            for a in 0..3 {
                assert!(p[a].abs() + 1.5 <= half[a] + 1e-12);
            }
        }
    }

    #[test]
    fn test_block_thinner_than_one_sphere_is_empty() {
        let half = Vec3::new(4.0, 4.0, 0.9);
        let spec = PackingSpec::block(Vec3::zeros(), half, 0.0, 1.0, 1.05, BoxFill::Lattice);
        assert!(spec.sample().is_empty());
    }

    #[test]
    fn test_sample_dispatches_by_domain() {
        let cyl = PackingSpec::cylinder(Vec3::zeros(), 1.0, -1.0, 1.0, 0.1, 2.1);
        let block = PackingSpec::block(
            Vec3::zeros(),
            Vec3::new(0.5, 0.5, 0.5),
            0.0,
            0.1,
            1.05,
            BoxFill::Lattice,
        );
        assert!(!cyl.sample().is_empty());
        assert!(!block.sample().is_empty());
    }

    #[test]
    fn test_zero_spacing_is_empty() {
        let mut spec = PackingSpec::cylinder(Vec3::zeros(), 1.0, -1.0, 1.0, 0.1, 2.1);
        spec.spacing = 0.0;
        assert!(spec.sample().is_empty());
    }
}
