//! Hexagonal and hexagonal-close-packed lattice sampling.

use tamp_math::Vec3;

/// Lattice sampler with a fixed nearest-neighbor distance.
///
/// In-plane points form a triangular lattice (rows `spacing·√3/2` apart,
/// odd rows shifted by half a spacing). Stacked layers follow the HCP
/// A/B alternation so that inter-layer neighbors are also exactly
/// `spacing` apart.
#[derive(Debug, Clone, Copy)]
pub struct HexSampler {
    pub spacing: f64,
}

impl HexSampler {
    pub fn new(spacing: f64) -> Self {
        Self { spacing }
    }

    fn is_valid(&self) -> bool {
        self.spacing.is_finite() && self.spacing > 0.0
    }

    /// Distance between lattice rows.
    #[inline]
    pub fn row_pitch(&self) -> f64 {
        self.spacing * 3.0_f64.sqrt() / 2.0
    }

    /// Distance between stacked HCP layers.
    #[inline]
    pub fn layer_pitch(&self) -> f64 {
        self.spacing * (2.0_f64 / 3.0).sqrt()
    }

    /// Sample a flat disk of the given radius in the plane `z = center.z`.
    ///
    /// The lattice is anchored on `center`, so a disk smaller than the
    /// spacing still yields the center point.
    pub fn sample_disk(&self, center: &Vec3, radius: f64) -> Vec<Vec3> {
        if !self.is_valid() || !(radius >= 0.0) {
            return Vec::new();
        }
        let s = self.spacing;
        let dy = self.row_pitch();
        let nj = (radius / dy).floor() as i64;
        let ni = (radius / s).ceil() as i64 + 1;
        let r2 = radius * radius;

        let mut points = Vec::new();
        for j in -nj..=nj {
            let y = j as f64 * dy;
            let shift = if j.rem_euclid(2) == 1 { 0.5 * s } else { 0.0 };
            for i in -ni..=ni {
                let x = i as f64 * s + shift;
                if x * x + y * y <= r2 {
                    points.push(Vec3::new(center.x + x, center.y + y, center.z));
                }
            }
        }
        points
    }

    /// Fill the box `center ± half_dims` with an HCP lattice.
    ///
    /// The first point sits on the minimum corner.
    pub fn sample_box(&self, center: &Vec3, half_dims: &Vec3) -> Vec<Vec3> {
        if !self.is_valid() || half_dims.iter().any(|h| !(*h >= 0.0)) {
            return Vec::new();
        }
        let s = self.spacing;
        let dy = self.row_pitch();
        let dz = self.layer_pitch();
        let min = center - half_dims;
        let extent = half_dims * 2.0;

        let mut points = Vec::new();
        let nk = (extent.z / dz).floor() as i64;
        for k in 0..=nk {
            let (ox, oy) = if k % 2 == 1 { (0.5 * s, dy / 3.0) } else { (0.0, 0.0) };
            if oy > extent.y {
                continue;
            }
            let z = min.z + k as f64 * dz;
            let nj = ((extent.y - oy) / dy).floor() as i64;
            for j in 0..=nj {
                let y = min.y + oy + j as f64 * dy;
                let row_shift = ox + if j % 2 == 1 { 0.5 * s } else { 0.0 };
                if row_shift > extent.x {
                    continue;
                }
                let ni = ((extent.x - row_shift) / s).floor() as i64;
                for i in 0..=ni {
                    let x = min.x + row_shift + i as f64 * s;
                    points.push(Vec3::new(x, y, z));
                }
            }
        }
        points
    }
}
