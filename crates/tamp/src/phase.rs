//! Settle → active → complete sequencing and boundary arming.

use serde::{Deserialize, Serialize};
use tamp_engine::{
    BoundaryHandle, BoundaryKinematics, Extreme, GranularEngine, KinematicsState,
};
use tamp_math::{Axis, Vec3};

use crate::error::{DriverError, Result};

/// Simulation phase. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Settling,
    Active,
    Complete,
}

/// How the moving boundary gets its motion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArmingPolicy {
    /// Registered unarmed; at the end of settling the boundary is placed
    /// `margin` beyond the packing's `extreme` along `axis` and starts
    /// moving at `velocity` from the current time.
    AfterSettle {
        axis: Axis,
        extreme: Extreme,
        margin: f64,
        velocity: f64,
    },
    /// Parameters known up front; the boundary moves from the first step.
    PreArmed { axis: Axis, state: KinematicsState },
}

impl ArmingPolicy {
    pub fn axis(&self) -> Axis {
        match self {
            ArmingPolicy::AfterSettle { axis, .. } | ArmingPolicy::PreArmed { axis, .. } => *axis,
        }
    }
}

/// Owns the moving boundary's handle and the phase state machine.
#[derive(Debug, Clone)]
pub struct PhaseController {
    phase: Phase,
    boundary: BoundaryHandle,
    rest_position: Vec3,
    policy: ArmingPolicy,
    kinematics: BoundaryKinematics,
}

impl PhaseController {
    pub fn new(boundary: BoundaryHandle, rest_position: Vec3, policy: ArmingPolicy) -> Self {
        let kinematics = match policy {
            ArmingPolicy::AfterSettle { axis, .. } => BoundaryKinematics::unarmed(axis),
            ArmingPolicy::PreArmed { axis, state } => BoundaryKinematics::pre_armed(axis, state),
        };
        Self {
            phase: Phase::Settling,
            boundary,
            rest_position,
            policy,
            kinematics,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn boundary(&self) -> BoundaryHandle {
        self.boundary
    }

    pub fn axis(&self) -> Axis {
        self.policy.axis()
    }

    pub fn policy(&self) -> &ArmingPolicy {
        &self.policy
    }

    /// The controller's copy of the boundary kinematics.
    pub fn kinematics(&self) -> &BoundaryKinematics {
        &self.kinematics
    }

    /// Hand the kinematics to the engine. Must happen before the engine is
    /// initialized or advanced; unarmed kinematics evaluate to zero offset.
    pub fn register<E: GranularEngine>(&self, engine: &mut E) -> Result<()> {
        engine.set_boundary_kinematics(self.boundary, self.kinematics)?;
        Ok(())
    }

    /// Settling → Active. For [`ArmingPolicy::AfterSettle`] this measures the
    /// packing and arms the kinematics in the engine before any active step.
    pub fn begin_active<E: GranularEngine>(&mut self, engine: &mut E) -> Result<KinematicsState> {
        self.transition(Phase::Settling, Phase::Active)?;
        if let ArmingPolicy::AfterSettle {
            axis,
            extreme,
            margin,
            velocity,
        } = self.policy
        {
            let edge = engine
                .particle_extreme(axis, extreme)
                .ok_or(DriverError::EmptyPacking)?;
            let state = KinematicsState {
                start_time: engine.time(),
                start_offset: edge + margin - axis.component(&self.rest_position),
                velocity,
            };
            self.kinematics.arm(state);
            engine.boundary_kinematics_mut(self.boundary)?.arm(state);
            log::info!(
                "armed {} at t = {:.4}: offset {:.4}, velocity {}",
                self.boundary,
                state.start_time,
                state.start_offset,
                state.velocity
            );
        }
        Ok(*self.kinematics.state())
    }

    /// Active → Complete.
    pub fn complete(&mut self) -> Result<()> {
        self.transition(Phase::Active, Phase::Complete)
    }

    /// Where the registered kinematics put the boundary at time `t`.
    pub fn expected_position(&self, t: f64) -> Vec3 {
        self.rest_position + self.kinematics.offset(t)
    }

    fn transition(&mut self, from: Phase, to: Phase) -> Result<()> {
        if self.phase != from {
            return Err(DriverError::PhaseOrder {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }
}
