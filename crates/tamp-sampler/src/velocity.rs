//! Initial velocity field for cylindrical packings.

use tamp_math::Vec3;

/// Inward settling bias: `(-x/R, -x/R, 0)` for each particle.
///
/// Both horizontal components follow the particle's `x` coordinate, so the
/// field is not radially symmetric. This matches the reference scenario and
/// is kept as-is.
pub fn settling_velocities(positions: &[Vec3], cylinder_radius: f64) -> Vec<Vec3> {
    positions
        .iter()
        .map(|p| {
            let v = -p.x / cylinder_radius;
            Vec3::new(v, v, 0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_follows_x_only() {
        let pos = vec![
            Vec3::new(2.5, 0.0, 1.0),
            Vec3::new(-5.0, 3.0, -2.0),
            Vec3::new(0.0, 4.0, 0.0),
        ];
        let vel = settling_velocities(&pos, 5.0);
        assert_eq!(vel[0], Vec3::new(-0.5, -0.5, 0.0));
        assert_eq!(vel[1], Vec3::new(1.0, 1.0, 0.0));
        // y does not contribute
        assert_eq!(vel[2], Vec3::zeros());
    }

    #[test]
    fn test_same_length_as_positions() {
        let pos = vec![Vec3::zeros(); 17];
        assert_eq!(settling_velocities(&pos, 1.0).len(), 17);
    }
}
