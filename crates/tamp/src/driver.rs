//! The fixed-cadence frame loop.

use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use tamp_engine::{BoundarySpec, GranularEngine, Particle};
use tamp_math::ForceScale;

use crate::error::{DriverError, Result};
use crate::frame::{FrameLog, FrameRecord};
use crate::phase::{ArmingPolicy, Phase, PhaseController};

/// Slack for `duration · fps` landing a hair below an integer.
const TICK_EPS: f64 = 1e-9;

/// Boundary positions read back from the engine may differ from the
/// registered kinematics by this much before a warning is logged.
const POSITION_TOLERANCE: f64 = 1e-6;

/// Number of whole frame steps in `duration`.
pub fn tick_count(duration: f64, fps: f64) -> u64 {
    if !(duration > 0.0) {
        return 0;
    }
    (duration * fps + TICK_EPS).floor() as u64
}

/// Snapshot base path for frame `index`.
pub fn snapshot_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("step{index:06}"))
}

/// Loop settings.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub fps: f64,
    /// Length of the settling phase.
    pub settle_time: f64,
    /// Simulation end time.
    pub end_time: f64,
    pub output_dir: PathBuf,
    /// Write `<output_dir>/initial` before the first advance.
    pub initial_snapshot: bool,
    pub force_scale: ForceScale,
}

impl DriverOptions {
    /// Check the cadence before any engine call.
    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(DriverError::InvalidCadence(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !(self.settle_time >= 0.0 && self.settle_time < self.end_time) {
            return Err(DriverError::InvalidCadence(format!(
                "settle time {} must lie in [0, {})",
                self.settle_time, self.end_time
            )));
        }
        Ok(())
    }

    pub fn frame_step(&self) -> f64 {
        1.0 / self.fps
    }

    pub fn settle_ticks(&self) -> u64 {
        tick_count(self.settle_time, self.fps)
    }

    /// Number of active frames.
    pub fn total_frames(&self) -> u64 {
        tick_count(self.end_time, self.fps).saturating_sub(self.settle_ticks())
    }
}

/// Everything a scenario hands to the driver.
#[derive(Debug, Clone)]
pub struct Setup {
    pub particles: Vec<Particle>,
    /// The boundary driven by the phase controller.
    pub moving: BoundarySpec,
    pub policy: ArmingPolicy,
    /// Static boundaries created alongside the moving one.
    pub fixed: Vec<BoundarySpec>,
}

/// Runs settle and active phases against an engine, producing a
/// [`FrameLog`] and one diagnostic line per frame on `report`.
pub struct SimulationDriver<E: GranularEngine, W: Write = Stdout> {
    engine: E,
    controller: PhaseController,
    options: DriverOptions,
    report: W,
    frames: FrameLog,
}

impl<E: GranularEngine> SimulationDriver<E, Stdout> {
    /// Prepare with diagnostics on standard output.
    pub fn prepare(engine: E, setup: Setup, options: DriverOptions) -> Result<Self> {
        Self::with_report(engine, setup, options, io::stdout())
    }
}

impl<E: GranularEngine, W: Write> SimulationDriver<E, W> {
    /// Load the packing, create boundaries, register the (possibly unarmed)
    /// kinematics and initialize the engine.
    pub fn with_report(
        mut engine: E,
        setup: Setup,
        options: DriverOptions,
        report: W,
    ) -> Result<Self> {
        options.validate()?;
        if setup.particles.is_empty() {
            return Err(DriverError::EmptyPacking);
        }

        engine.load_particles(&setup.particles)?;
        for spec in setup.fixed {
            engine.create_boundary(spec)?;
        }
        let rest = setup.moving.rest_position();
        let handle = engine.create_boundary(setup.moving)?;
        let controller = PhaseController::new(handle, rest, setup.policy);
        controller.register(&mut engine)?;
        engine.initialize()?;

        Ok(Self {
            engine,
            controller,
            options,
            report,
            frames: FrameLog::new(),
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn frames(&self) -> &FrameLog {
        &self.frames
    }

    pub fn into_parts(self) -> (E, FrameLog, W) {
        (self.engine, self.frames, self.report)
    }

    /// Run every phase to completion.
    pub fn run(&mut self) -> Result<&FrameLog> {
        let phase = self.controller.phase();
        if phase != Phase::Settling {
            return Err(DriverError::PhaseOrder {
                from: phase,
                to: Phase::Active,
            });
        }

        let dir = self.options.output_dir.clone();
        std::fs::create_dir_all(&dir)?;
        if self.options.initial_snapshot {
            self.engine.write_snapshot(&dir.join("initial"))?;
        }

        let dt = self.options.frame_step();
        let t0 = self.engine.time();
        let settle = self.options.settle_ticks();
        let total = self.options.total_frames();

        log::info!(
            "{} particles, {settle} settling steps, {total} frames at {} fps",
            self.engine.num_particles(),
            self.options.fps
        );

        for n in 1..=settle {
            self.engine.advance(dt)?;
            log::debug!("settling: t = {:.4}", t0 + n as f64 * dt);
        }

        self.controller.begin_active(&mut self.engine)?;

        for n in 0..total {
            let index = n as usize;
            self.engine.advance(dt)?;
            let time = t0 + (settle + n + 1) as f64 * dt;

            let snapshot = snapshot_path(&dir, index);
            self.engine.write_snapshot(&snapshot)?;

            let record = self.measure(index, time, snapshot)?;
            self.emit(&record, total)?;
            self.frames.push(record);
        }

        self.controller.complete()?;
        let stats = self.frames.stats();
        log::info!(
            "done: {} frames, peak force {:.6} {}, max contacts {}",
            stats.frames,
            stats.peak_force,
            self.options.force_scale.unit,
            stats.max_contacts
        );
        Ok(&self.frames)
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    fn measure(&self, index: usize, time: f64, snapshot: PathBuf) -> Result<FrameRecord> {
        let handle = self.controller.boundary();
        let boundary_position = self.engine.boundary_position(handle)?;
        let expected = self.controller.expected_position(time);
        let drift = (boundary_position - expected).norm();
        if drift > POSITION_TOLERANCE * (1.0 + expected.norm()) {
            log::warn!(
                "frame {index}: engine reports boundary at {:?}, kinematics give {:?}",
                boundary_position.as_slice(),
                expected.as_slice()
            );
        }

        let force = self.engine.boundary_reaction_force(handle)?;
        Ok(FrameRecord {
            index,
            time,
            snapshot,
            contact_count: self.engine.contact_count(),
            reaction_force: self.options.force_scale.apply(&force),
            boundary_position,
        })
    }

    fn emit(&mut self, record: &FrameRecord, total: u64) -> Result<()> {
        let axis = self.controller.axis();
        let position: f64 = axis.component(&record.boundary_position);
        writeln!(
            self.report,
            "frame {} of {}, t = {:.4}, boundary {:?} = {:.4}, contacts = {}, force = {:.6} {}",
            record.index,
            total,
            record.time,
            axis,
            position,
            record.contact_count,
            record.reaction_magnitude(),
            self.options.force_scale.unit
        )?;
        Ok(())
    }
}
