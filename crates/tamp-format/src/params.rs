//! Parameter schema and loader.

use crate::error::{FormatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which experiment to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Settle a cylindrical packing, then push a lid down onto it.
    #[default]
    Compression,
    /// Drive a wall into a box-shaped bed from outside the domain.
    MovingBoundary,
}

impl Scenario {
    pub fn default_fps(self) -> f64 {
        match self {
            Scenario::Compression => 100.0,
            Scenario::MovingBoundary => 50.0,
        }
    }

    pub fn default_settle_time(self) -> f64 {
        match self {
            Scenario::Compression => 0.5,
            Scenario::MovingBoundary => 0.0,
        }
    }

    /// Spacing multiplier: of the radius for the cylinder, of the diameter
    /// for the box.
    pub fn default_packing_factor(self) -> f64 {
        match self {
            Scenario::Compression => 2.1,
            Scenario::MovingBoundary => 1.05,
        }
    }

    pub fn default_initial_snapshot(self) -> bool {
        matches!(self, Scenario::MovingBoundary)
    }
}

/// Snapshot file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    #[serde(alias = "CSV")]
    Csv,
    #[serde(alias = "BINARY")]
    Binary,
    #[serde(alias = "NONE")]
    None,
}

/// Contact-model coefficients, passed through to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactParams {
    #[serde(rename = "normalStiffS2S")]
    pub normal_stiff_s2s: f64,
    #[serde(rename = "normalStiffS2W")]
    pub normal_stiff_s2w: f64,
    #[serde(rename = "normalDampS2S")]
    pub normal_damp_s2s: f64,
    #[serde(rename = "normalDampS2W")]
    pub normal_damp_s2w: f64,
    #[serde(rename = "tangentDampS2S")]
    pub tangent_damp_s2s: f64,
    #[serde(rename = "tangentDampS2W")]
    pub tangent_damp_s2w: f64,
    #[serde(rename = "static_friction_coeffS2S")]
    pub static_friction_s2s: f64,
    #[serde(rename = "static_friction_coeffS2W")]
    pub static_friction_s2w: f64,
    pub cohesion_ratio: f64,
    pub adhesion_ratio_s2w: f64,
    #[serde(rename = "grav_X")]
    pub grav_x: f64,
    #[serde(rename = "grav_Y")]
    pub grav_y: f64,
    #[serde(rename = "grav_Z")]
    pub grav_z: f64,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            normal_stiff_s2s: 1.0e7,
            normal_stiff_s2w: 1.0e7,
            normal_damp_s2s: 1.0e4,
            normal_damp_s2w: 1.0e4,
            tangent_damp_s2s: 5.0e3,
            tangent_damp_s2w: 5.0e3,
            static_friction_s2s: 0.5,
            static_friction_s2w: 0.5,
            cohesion_ratio: 0.0,
            adhesion_ratio_s2w: 0.0,
            grav_x: 0.0,
            grav_y: 0.0,
            grav_z: -980.0,
        }
    }
}

/// Driver-level settings. Unset options resolve to the scenario defaults
/// through the accessors on [`SimParams`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverParams {
    pub scenario: Scenario,
    pub fps: Option<f64>,
    pub settle_time: Option<f64>,
    pub packing_factor: Option<f64>,
    pub initial_snapshot: Option<bool>,
    /// Lid velocity once armed (compression). Negative moves inward.
    pub compression_rate: f64,
    /// Wall velocity from time zero (moving boundary).
    pub plane_speed: f64,
    /// How far outside the domain the moving wall starts.
    pub plane_standoff: f64,
    /// Gap between the box fill and the domain walls.
    pub box_clearance: f64,
    /// Fill the box with seeded Poisson-disk layers instead of a lattice.
    pub poisson_seed: Option<u64>,
    /// Engine force units → reporting units.
    pub force_scale: f64,
    pub force_unit: String,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            scenario: Scenario::default(),
            fps: None,
            settle_time: None,
            packing_factor: None,
            initial_snapshot: None,
            compression_rate: -1.0,
            plane_speed: 10.0,
            plane_standoff: 10.0,
            box_clearance: 1.2,
            poisson_seed: None,
            force_scale: 1e-5,
            force_unit: "N".to_string(),
        }
    }
}

/// Full parameter file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    pub sphere_radius: f64,
    pub sphere_density: f64,
    #[serde(rename = "box_X")]
    pub box_x: f64,
    #[serde(rename = "box_Y")]
    pub box_y: f64,
    #[serde(rename = "box_Z")]
    pub box_z: f64,
    /// Engine integration step.
    pub step_size: f64,
    /// Simulation end time.
    pub time_end: f64,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub write_mode: OutputMode,
    #[serde(default = "default_verbose")]
    pub verbose: u8,
    #[serde(flatten)]
    pub contact: ContactParams,
    #[serde(flatten)]
    pub driver: DriverParams,
}

fn default_verbose() -> u8 {
    1
}

impl SimParams {
    /// Load and validate a parameter file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: SimParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn fps(&self) -> f64 {
        self.driver.fps.unwrap_or_else(|| self.driver.scenario.default_fps())
    }

    pub fn settle_time(&self) -> f64 {
        self.driver
            .settle_time
            .unwrap_or_else(|| self.driver.scenario.default_settle_time())
    }

    pub fn packing_factor(&self) -> f64 {
        self.driver
            .packing_factor
            .unwrap_or_else(|| self.driver.scenario.default_packing_factor())
    }

    pub fn initial_snapshot(&self) -> bool {
        self.driver
            .initial_snapshot
            .unwrap_or_else(|| self.driver.scenario.default_initial_snapshot())
    }

    /// Gravity vector [x, y, z].
    pub fn gravity(&self) -> [f64; 3] {
        [self.contact.grav_x, self.contact.grav_y, self.contact.grav_z]
    }

    /// Check the values the driver relies on.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(FormatError::InvalidParameter(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        }

        positive("sphere_radius", self.sphere_radius)?;
        positive("sphere_density", self.sphere_density)?;
        positive("box_X", self.box_x)?;
        positive("box_Y", self.box_y)?;
        positive("box_Z", self.box_z)?;
        positive("step_size", self.step_size)?;
        positive("time_end", self.time_end)?;
        positive("fps", self.fps())?;
        positive("packing_factor", self.packing_factor())?;

        let settle = self.settle_time();
        if !settle.is_finite() || settle < 0.0 || settle >= self.time_end {
            return Err(FormatError::InvalidParameter(format!(
                "settle_time must lie in [0, time_end), got {settle}"
            )));
        }
        if !self.driver.force_scale.is_finite() {
            return Err(FormatError::InvalidParameter(
                "force_scale must be finite".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(FormatError::InvalidParameter(
                "output_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
