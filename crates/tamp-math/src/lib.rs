//! Math primitives shared by the tamp crates.
//!
//! Thin aliases over nalgebra plus the coordinate-axis selector used by the
//! samplers, the boundary kinematics and the engine queries.

pub mod units;

pub use units::{CGS_TO_SI_ENERGY, CGS_TO_SI_FORCE, ForceScale};

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 3D vector alias.
pub type Vec3 = na::Vector3<f64>;
/// 2D vector alias (in-plane sampling).
pub type Vec2 = na::Vector2<f64>;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into a `Vec3`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }

    /// Read the component of `v` along this axis.
    #[inline]
    pub fn component(self, v: &Vec3) -> f64 {
        v[self.index()]
    }
}
