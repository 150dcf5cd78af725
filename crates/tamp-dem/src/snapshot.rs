//! Particle state files.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use tamp_math::Vec3;

/// On-disk layout of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `x,y,z,absv` rows with a header, written to `<path>.csv`.
    Csv,
    /// Packed native-endian `f32` triples, written to `<path>.raw`.
    Binary,
    /// Nothing is written.
    None,
}

impl SnapshotFormat {
    pub fn extension(self) -> Option<&'static str> {
        match self {
            SnapshotFormat::Csv => Some("csv"),
            SnapshotFormat::Binary => Some("raw"),
            SnapshotFormat::None => None,
        }
    }

    /// Final file path for `base`, or `None` when nothing is written.
    pub fn file_path(self, base: &Path) -> Option<PathBuf> {
        let ext = self.extension()?;
        let mut name = OsString::from(base.as_os_str());
        name.push(".");
        name.push(ext);
        Some(PathBuf::from(name))
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct PackedPoint {
    x: f32,
    y: f32,
    z: f32,
}

/// Write positions (and speeds, for CSV) to `base` in the given format.
pub fn write(
    format: SnapshotFormat,
    base: &Path,
    positions: &[Vec3],
    velocities: &[Vec3],
) -> std::io::Result<()> {
    let Some(path) = format.file_path(base) else {
        return Ok(());
    };
    let mut out = BufWriter::new(File::create(&path)?);
    match format {
        SnapshotFormat::Csv => {
            writeln!(out, "x,y,z,absv")?;
            for (x, v) in positions.iter().zip(velocities) {
                writeln!(out, "{},{},{},{}", x.x, x.y, x.z, v.norm())?;
            }
        }
        SnapshotFormat::Binary => {
            let packed: Vec<PackedPoint> = positions
                .iter()
                .map(|x| PackedPoint {
                    x: x.x as f32,
                    y: x.y as f32,
                    z: x.z as f32,
                })
                .collect();
            out.write_all(bytemuck::cast_slice(&packed))?;
        }
        SnapshotFormat::None => {}
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tamp-dem-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_file_path_appends_extension() {
        let base = Path::new("out/step000007");
        assert_eq!(
            SnapshotFormat::Csv.file_path(base),
            Some(PathBuf::from("out/step000007.csv"))
        );
        assert_eq!(
            SnapshotFormat::Binary.file_path(base),
            Some(PathBuf::from("out/step000007.raw"))
        );
        assert_eq!(SnapshotFormat::None.file_path(base), None);
    }

    #[test]
    fn test_csv_rows() {
        let dir = scratch_dir("csv");
        let base = dir.join("step000000");
        let pos = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.5, 0.0)];
        let vel = vec![Vec3::new(3.0, 4.0, 0.0), Vec3::zeros()];
        write(SnapshotFormat::Csv, &base, &pos, &vel).unwrap();

        let text = std::fs::read_to_string(dir.join("step000000.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "x,y,z,absv");
        assert_eq!(lines[1], "1,2,3,5");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_binary_size() {
        let dir = scratch_dir("bin");
        let base = dir.join("step000001");
        let pos = vec![Vec3::zeros(); 5];
        write(SnapshotFormat::Binary, &base, &pos, &pos).unwrap();
        let bytes = std::fs::read(dir.join("step000001.raw")).unwrap();
        assert_eq!(bytes.len(), 5 * 3 * 4);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_none_writes_nothing() {
        let dir = scratch_dir("none");
        let base = dir.join("step000002");
        write(SnapshotFormat::None, &base, &[Vec3::zeros()], &[Vec3::zeros()]).unwrap();
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        std::fs::remove_dir_all(dir).ok();
    }
}
