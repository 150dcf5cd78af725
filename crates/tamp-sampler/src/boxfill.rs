//! Block fills for rectangular domains.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tamp_math::{Vec2, Vec3};

use crate::hex::HexSampler;

/// Candidate attempts per active sample in Bridson's algorithm.
const POISSON_ATTEMPTS: usize = 30;

/// How to fill a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxFill {
    /// Deterministic hexagonal-close-packed lattice.
    #[default]
    Lattice,
    /// Poisson-disk sampling layer by layer; layers are one spacing apart.
    PoissonLayers { seed: u64 },
}

/// Fill `center ± half_dims` with points at least `spacing` apart.
///
/// Produces one dense block. Empty when the spacing is not positive or a
/// half extent is negative.
pub fn box_fill(center: &Vec3, half_dims: &Vec3, spacing: f64, fill: &BoxFill) -> Vec<Vec3> {
    if !(spacing > 0.0) || !spacing.is_finite() || half_dims.iter().any(|h| !(*h >= 0.0)) {
        return Vec::new();
    }
    match fill {
        BoxFill::Lattice => HexSampler::new(spacing).sample_box(center, half_dims),
        BoxFill::PoissonLayers { seed } => poisson_layers(center, half_dims, spacing, *seed),
    }
}

fn poisson_layers(center: &Vec3, half_dims: &Vec3, spacing: f64, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let min = center - half_dims;
    let max = center + half_dims;
    let lo = Vec2::new(min.x, min.y);
    let hi = Vec2::new(max.x, max.y);

    let nk = ((max.z - min.z) / spacing).floor() as u64;
    let mut points = Vec::new();
    for k in 0..=nk {
        let z = min.z + k as f64 * spacing;
        for p in poisson_disk_2d(&lo, &hi, spacing, &mut rng) {
            points.push(Vec3::new(p.x, p.y, z));
        }
    }
    points
}

/// Bridson's Poisson-disk sampling over the rectangle `[lo, hi]`.
pub fn poisson_disk_2d<R: Rng>(lo: &Vec2, hi: &Vec2, spacing: f64, rng: &mut R) -> Vec<Vec2> {
    let size = hi - lo;
    if !(spacing > 0.0) || size.x < 0.0 || size.y < 0.0 {
        return Vec::new();
    }
    let cell = spacing / 2.0_f64.sqrt();
    let nx = (size.x / cell).floor() as usize + 1;
    let ny = (size.y / cell).floor() as usize + 1;
    let mut grid: Vec<Option<usize>> = vec![None; nx * ny];
    let cell_of = |p: &Vec2| -> (usize, usize) {
        let i = (((p.x - lo.x) / cell).floor() as usize).min(nx - 1);
        let j = (((p.y - lo.y) / cell).floor() as usize).min(ny - 1);
        (i, j)
    };

    let mut samples: Vec<Vec2> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let first = Vec2::new(
        lo.x + rng.r#gen::<f64>() * size.x,
        lo.y + rng.r#gen::<f64>() * size.y,
    );
    let (i0, j0) = cell_of(&first);
    grid[j0 * nx + i0] = Some(0);
    samples.push(first);
    active.push(0);

    while !active.is_empty() {
        let slot = rng.gen_range(0..active.len());
        let base = samples[active[slot]];
        let mut placed = false;

        for _ in 0..POISSON_ATTEMPTS {
            let radius = spacing * (1.0 + rng.r#gen::<f64>());
            let angle = rng.r#gen::<f64>() * std::f64::consts::TAU;
            let cand = base + Vec2::new(radius * angle.cos(), radius * angle.sin());
            if cand.x < lo.x || cand.x > hi.x || cand.y < lo.y || cand.y > hi.y {
                continue;
            }
            let (ci, cj) = cell_of(&cand);
            let mut clear = true;
            'scan: for gj in cj.saturating_sub(2)..=(cj + 2).min(ny - 1) {
                for gi in ci.saturating_sub(2)..=(ci + 2).min(nx - 1) {
                    if let Some(idx) = grid[gj * nx + gi] {
                        if (samples[idx] - cand).norm() < spacing {
                            clear = false;
                            break 'scan;
                        }
                    }
                }
            }
            if clear {
                let idx = samples.len();
                grid[cj * nx + ci] = Some(idx);
                samples.push(cand);
                active.push(idx);
                placed = true;
                break;
            }
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    samples
}
