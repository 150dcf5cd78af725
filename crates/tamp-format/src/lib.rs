//! Simulation parameter files for tamp.
//!
//! The JSON layout is flat and uses the key names of the established GPU granular
//! demo parameter files (`box_X`, `normalStiffS2S`, ...), so existing parameter
//! files load unchanged. Driver-level keys (`scenario`, `fps`,
//! `settle_time`, ...) are optional and fall back to per-scenario defaults.

pub mod error;
pub mod params;

pub use error::{FormatError, Result};
pub use params::{ContactParams, DriverParams, OutputMode, Scenario, SimParams};
