//! Cylindrical fill built from stacked hexagonal disks.

use tamp_math::Vec3;

use crate::hex::HexSampler;

/// Heights of the layer centers for a vertical fill.
///
/// The first layer sits one radius above `z_min`; a layer is admitted while
/// its center plus one radius stays strictly below `z_max`. Heights are
/// computed as `z_min + r + k·spacing` rather than accumulated.
pub fn layer_heights(z_min: f64, z_max: f64, r: f64, spacing: f64) -> Vec<f64> {
    if !(spacing > 0.0) || !(r > 0.0) || !spacing.is_finite() {
        return Vec::new();
    }
    let base = z_min + r;
    let mut heights = Vec::new();
    let mut k = 0_u64;
    loop {
        let z = base + k as f64 * spacing;
        if !(z + r < z_max) {
            break;
        }
        heights.push(z);
        k += 1;
    }
    heights
}

/// Fill a vertical cylinder with hexagonal layers.
///
/// Each layer is a full disk of radius `cylinder_radius - r` sampled by
/// [`HexSampler::sample_disk`]; the per-layer count is whatever the disk
/// sampler yields. Returns an empty vector when the spacing is not
/// positive or the cylinder cannot hold one particle.
pub fn cylinder_layers(
    center: &Vec3,
    cylinder_radius: f64,
    z_min: f64,
    z_max: f64,
    r: f64,
    spacing: f64,
) -> Vec<Vec3> {
    let disk_radius = cylinder_radius - r;
    if !(disk_radius >= 0.0) || !(z_max - z_min >= 2.0 * r) {
        return Vec::new();
    }
    let sampler = HexSampler::new(spacing);
    let heights = layer_heights(z_min, z_max, r, spacing);

    let mut points = Vec::new();
    for z in &heights {
        let layer_center = Vec3::new(center.x, center.y, *z);
        points.extend(sampler.sample_disk(&layer_center, disk_radius));
    }
    log::debug!(
        "cylinder fill: {} layers, {} particles (spacing {})",
        heights.len(),
        points.len(),
        spacing
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    /// floor((H - 2r) / s) + 1 for non-integer ratios.
    fn expected_layers(height: f64, r: f64, s: f64) -> usize {
        ((height - 2.0 * r) / s).floor() as usize + 1
    }

    #[test]
    fn test_layer_count_formula() {
        // 10 x 10 x 20 domain, r = 0.1, spacing 2.1r
        let heights = layer_heights(-10.0, 10.0, 0.1, 0.21);
        assert_eq!(heights.len(), expected_layers(20.0, 0.1, 0.21));
        assert_eq!(heights.len(), 95);
    }

    #[test]
    fn test_layer_count_small_domains() {
        assert_eq!(layer_heights(0.0, 1.0, 0.1, 0.25).len(), expected_layers(1.0, 0.1, 0.25));
        assert_eq!(layer_heights(-0.5, 0.5, 0.2, 0.45).len(), expected_layers(1.0, 0.2, 0.45));
    }

    #[test]
    fn test_first_layer_one_radius_up() {
        let heights = layer_heights(-10.0, 10.0, 0.1, 0.21);
        assert!((heights[0] - (-9.9)).abs() < 1e-12);
        let top = *heights.last().unwrap();
        assert!(top + 0.1 < 10.0);
        assert!(top + 0.21 + 0.1 >= 10.0);
    }

    #[test]
    fn test_count_is_sum_of_layers() {
        let center = Vec3::zeros();
        let pts = cylinder_layers(&center, 1.0, -1.0, 1.0, 0.1, 0.21);
        let per_layer = HexSampler::new(0.21)
            .sample_disk(&Vec3::zeros(), 0.9)
            .len();
        let layers = layer_heights(-1.0, 1.0, 0.1, 0.21).len();
        assert_eq!(pts.len(), per_layer * layers);
    }

    #[test]
    fn test_cylinder_too_thin_is_empty() {
        assert!(cylinder_layers(&Vec3::zeros(), 0.05, -1.0, 1.0, 0.1, 0.21).is_empty());
    }

    #[test]
    fn test_cylinder_too_short_is_empty() {
        assert!(cylinder_layers(&Vec3::zeros(), 1.0, 0.0, 0.15, 0.1, 0.21).is_empty());
    }

    #[test]
    fn test_bad_spacing_is_empty() {
        assert!(cylinder_layers(&Vec3::zeros(), 1.0, -1.0, 1.0, 0.1, 0.0).is_empty());
        assert!(cylinder_layers(&Vec3::zeros(), 1.0, -1.0, 1.0, 0.1, -0.2).is_empty());
    }
}
