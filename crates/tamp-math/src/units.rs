//! Unit-conversion scales.
//!
//! The engine works in whatever unit system the configuration uses (the
//! shipped scenarios are CGS). Reported quantities are converted with an
//! explicit linear [`ForceScale`] instead of a global constant.

use serde::{Deserialize, Serialize};

use crate::Vec3;

/// dyn → N
pub const CGS_TO_SI_FORCE: f64 = 1e-5;
/// erg → J
pub const CGS_TO_SI_ENERGY: f64 = 1e-7;

/// Linear force conversion from engine units to a reporting unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceScale {
    /// Multiplier applied to engine-unit forces.
    pub factor: f64,
    /// Label of the reporting unit (e.g. "N").
    pub unit: String,
}

impl ForceScale {
    pub fn new(factor: f64, unit: impl Into<String>) -> Self {
        Self {
            factor,
            unit: unit.into(),
        }
    }

    /// Identity scale: report in engine units.
    pub fn identity() -> Self {
        Self::new(1.0, "engine")
    }

    /// Convert a force vector.
    #[inline]
    pub fn apply(&self, force: &Vec3) -> Vec3 {
        force * self.factor
    }
}

impl Default for ForceScale {
    fn default() -> Self {
        Self::new(CGS_TO_SI_FORCE, "N")
    }
}
