//! Prescribed boundary motion.
//!
//! A [`BoundaryKinematics`] is registered with the engine as soon as the
//! boundary exists, but its parameters may only become known later (for
//! example after the packing has settled). Until [`BoundaryKinematics::arm`]
//! is called the offset is zero, so an early evaluation leaves the boundary
//! at its rest position.

use serde::{Deserialize, Serialize};
use tamp_math::{Axis, Vec3};

/// Linear-in-time motion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicsState {
    /// Simulation time at which motion starts.
    pub start_time: f64,
    /// Offset from the rest position at `start_time`.
    pub start_offset: f64,
    /// Signed speed along the motion axis.
    pub velocity: f64,
}

impl KinematicsState {
    /// Motion from the rest position starting at time zero.
    pub fn from_rest(velocity: f64) -> Self {
        Self {
            start_time: 0.0,
            start_offset: 0.0,
            velocity,
        }
    }

    /// Scalar displacement `start_offset + velocity · (t - start_time)`.
    #[inline]
    pub fn displacement(&self, t: f64) -> f64 {
        self.start_offset + self.velocity * (t - self.start_time)
    }
}

/// Time-to-offset function for one boundary, gated by an armed flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryKinematics {
    axis: Axis,
    state: KinematicsState,
    armed: bool,
}

impl BoundaryKinematics {
    /// Registered but not yet parameterized. Evaluates to zero.
    pub fn unarmed(axis: Axis) -> Self {
        Self {
            axis,
            state: KinematicsState::default(),
            armed: false,
        }
    }

    /// Parameters known up front; active from the first evaluation.
    pub fn pre_armed(axis: Axis, state: KinematicsState) -> Self {
        Self {
            axis,
            state,
            armed: true,
        }
    }

    /// Finalize the parameters. Subsequent evaluations use `state`.
    pub fn arm(&mut self, state: KinematicsState) {
        self.state = state;
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn state(&self) -> &KinematicsState {
        &self.state
    }

    /// Offset from the rest position at simulation time `t`.
    pub fn offset(&self, t: f64) -> Vec3 {
        if !self.armed {
            return Vec3::zeros();
        }
        self.axis.unit() * self.state.displacement(t)
    }

    /// Boundary velocity; zero while unarmed.
    pub fn velocity(&self) -> Vec3 {
        if !self.armed {
            return Vec3::zeros();
        }
        self.axis.unit() * self.state.velocity
    }
}
