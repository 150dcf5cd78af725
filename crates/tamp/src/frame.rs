//! Per-frame records and the ordered frame log.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tamp_math::Vec3;

use crate::error::Result;

/// Diagnostics captured after one active frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Zero-based, gapless.
    pub index: usize,
    /// Simulation time after the frame's advance.
    pub time: f64,
    /// Snapshot base path handed to the engine writer.
    pub snapshot: PathBuf,
    pub contact_count: usize,
    /// Reaction force on the moving boundary, in reporting units.
    pub reaction_force: Vec3,
    /// Boundary position as reported by the engine.
    pub boundary_position: Vec3,
}

impl FrameRecord {
    pub fn reaction_magnitude(&self) -> f64 {
        self.reaction_force.norm()
    }
}

/// Append-only log of frame records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameLog {
    frames: Vec<FrameRecord>,
}

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next record. Indices must continue the sequence.
    pub(crate) fn push(&mut self, record: FrameRecord) {
        debug_assert_eq!(record.index, self.frames.len());
        self.frames.push(record);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameRecord> {
        self.frames.iter()
    }

    pub fn last(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }

    pub fn as_slice(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Export to JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.frames)
    }

    /// Export to JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Summary over all recorded frames.
    pub fn stats(&self) -> FrameStats {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return FrameStats::default();
        };

        let mut peak_force = 0.0;
        let mut peak_force_frame = first.index;
        for f in &self.frames {
            let m = f.reaction_magnitude();
            if m > peak_force {
                peak_force = m;
                peak_force_frame = f.index;
            }
        }

        FrameStats {
            frames: self.len(),
            duration: last.time - first.time,
            peak_force,
            peak_force_frame,
            max_contacts: self.frames.iter().map(|f| f.contact_count).max().unwrap_or(0),
            final_boundary_position: last.boundary_position,
        }
    }
}

/// Frame log statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frames: usize,
    /// Time between the first and last frame.
    pub duration: f64,
    /// Largest reaction-force magnitude, in reporting units.
    pub peak_force: f64,
    pub peak_force_frame: usize,
    pub max_contacts: usize,
    pub final_boundary_position: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(index: usize, force_z: f64, contacts: usize) -> FrameRecord {
        FrameRecord {
            index,
            time: 0.5 + 0.01 * (index + 1) as f64,
            snapshot: PathBuf::from(format!("out/step{index:06}")),
            contact_count: contacts,
            reaction_force: Vec3::new(0.0, 0.0, force_z),
            boundary_position: Vec3::new(0.0, 0.0, 9.0 - 0.01 * index as f64),
        }
    }

    #[test]
    fn test_empty_log() {
        let log = FrameLog::new();
        assert!(log.is_empty());
        assert!(log.last().is_none());
        assert_eq!(log.stats(), FrameStats::default());
    }

    #[test]
    fn test_stats() {
        let mut log = FrameLog::new();
        log.push(record(0, 0.0, 10));
        log.push(record(1, -3.0, 40));
        log.push(record(2, 2.0, 25));

        let stats = log.stats();
        assert_eq!(stats.frames, 3);
        assert_relative_eq!(stats.duration, 0.02, epsilon = 1e-12);
        assert_relative_eq!(stats.peak_force, 3.0);
        assert_eq!(stats.peak_force_frame, 1);
        assert_eq!(stats.max_contacts, 40);
        assert_relative_eq!(stats.final_boundary_position.z, 8.98, epsilon = 1e-12);
    }

    #[test]
    fn test_to_json() {
        let mut log = FrameLog::new();
        log.push(record(0, 1.5, 3));
        let json = log.to_json().unwrap();
        assert!(json.contains("\"index\": 0"));
        assert!(json.contains("step000000"));
        let back: Vec<FrameRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log.as_slice());
    }
}
