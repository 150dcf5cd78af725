//! The two shipped experiments, built from a parameter file.

use tamp_dem::{ContactModel, DemParams, DemSystem, SnapshotFormat};
use tamp_engine::{BoundarySpec, Extreme, KinematicsState, Particle};
use tamp_format::{OutputMode, Scenario, SimParams};
use tamp_math::{Axis, ForceScale, Vec3};
use tamp_sampler::{BoxFill, PackingSpec, settling_velocities};

use crate::driver::{DriverOptions, Setup};
use crate::phase::ArmingPolicy;

/// Engine parameters from the contact-model section of the file.
pub fn dem_params(params: &SimParams) -> DemParams {
    let c = &params.contact;
    DemParams {
        sphere_radius: params.sphere_radius,
        sphere_density: params.sphere_density,
        domain: Vec3::new(params.box_x, params.box_y, params.box_z),
        gravity: Vec3::from(params.gravity()),
        sphere: ContactModel {
            kn: c.normal_stiff_s2s,
            gn: c.normal_damp_s2s,
            gt: c.tangent_damp_s2s,
            mu: c.static_friction_s2s,
        },
        wall: ContactModel {
            kn: c.normal_stiff_s2w,
            gn: c.normal_damp_s2w,
            gt: c.tangent_damp_s2w,
            mu: c.static_friction_s2w,
        },
        cohesion_ratio: c.cohesion_ratio,
        adhesion_ratio_s2w: c.adhesion_ratio_s2w,
        step_size: params.step_size,
        snapshot_format: match params.write_mode {
            OutputMode::Csv => SnapshotFormat::Csv,
            OutputMode::Binary => SnapshotFormat::Binary,
            OutputMode::None => SnapshotFormat::None,
        },
    }
}

pub fn driver_options(params: &SimParams) -> DriverOptions {
    DriverOptions {
        fps: params.fps(),
        settle_time: params.settle_time(),
        end_time: params.time_end,
        output_dir: params.output_dir.clone(),
        initial_snapshot: params.initial_snapshot(),
        force_scale: ForceScale::new(params.driver.force_scale, params.driver.force_unit.clone()),
    }
}

/// Packing, boundaries and arming policy for the configured scenario.
pub fn setup(params: &SimParams) -> Setup {
    match params.driver.scenario {
        Scenario::Compression => compression(params),
        Scenario::MovingBoundary => moving_boundary(params),
    }
}

/// Engine, setup and loop options in one go.
pub fn build(params: &SimParams) -> (DemSystem, Setup, DriverOptions) {
    (DemSystem::new(dem_params(params)), setup(params), driver_options(params))
}

/// Hexagonal layers in a cylinder, settled, then a lid pushed down from
/// just above the topmost sphere.
fn compression(params: &SimParams) -> Setup {
    let r = params.sphere_radius;
    let half_z = params.box_z / 2.0;
    let cyl_radius = params.box_x.min(params.box_y) / 2.0;

    let packing = PackingSpec::cylinder(
        Vec3::zeros(),
        cyl_radius,
        -half_z,
        half_z,
        r,
        params.packing_factor(),
    );
    let positions = packing.sample();
    let velocities = settling_velocities(&positions, cyl_radius);

    Setup {
        particles: Particle::zip(&positions, &velocities),
        moving: BoundarySpec::Plane {
            position: Vec3::new(0.0, 0.0, half_z),
            normal: Vec3::new(0.0, 0.0, -1.0),
            track_forces: true,
        },
        policy: ArmingPolicy::AfterSettle {
            axis: Axis::Z,
            extreme: Extreme::Max,
            margin: r,
            velocity: params.driver.compression_rate,
        },
        fixed: vec![BoundarySpec::CylinderZ {
            center: Vec3::zeros(),
            radius: cyl_radius,
            track_forces: false,
        }],
    }
}

/// A block in the bottom fifth of the box, hit by a wall that starts
/// outside the domain and moves from time zero.
fn moving_boundary(params: &SimParams) -> Setup {
    let r = params.sphere_radius;
    // The fill region shares its floor and side faces with the domain.
    let half_dims = Vec3::new(params.box_x / 2.0, params.box_y / 2.0, params.box_z / 10.0);
    let center = Vec3::new(0.0, 0.0, -params.box_z / 2.0 + params.box_z / 10.0);
    let fill = match params.driver.poisson_seed {
        Some(seed) => BoxFill::PoissonLayers { seed },
        None => BoxFill::Lattice,
    };

    let packing = PackingSpec::block(
        center,
        half_dims,
        params.driver.box_clearance,
        r,
        params.packing_factor(),
        fill,
    );
    let positions = packing.sample();

    Setup {
        particles: positions.into_iter().map(Particle::at_rest).collect(),
        moving: BoundarySpec::Plane {
            position: Vec3::new(-params.box_x / 2.0 - params.driver.plane_standoff, 0.0, 0.0),
            normal: Vec3::new(1.0, 0.0, 0.0),
            track_forces: true,
        },
        policy: ArmingPolicy::PreArmed {
            axis: Axis::X,
            state: KinematicsState::from_rest(params.driver.plane_speed),
        },
        fixed: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(extra: &str) -> SimParams {
        let json = format!(
            r#"{{
                "sphere_radius": 0.5,
                "sphere_density": 2.5,
                "box_X": 10.0,
                "box_Y": 10.0,
                "box_Z": 20.0,
                "step_size": 1e-4,
                "time_end": 1.0,
                "output_dir": "out"
                {extra}
            }}"#
        );
        SimParams::from_json(&json).unwrap()
    }

    #[test]
    fn test_compression_setup() {
        let p = params("");
        let s = setup(&p);
        assert!(!s.particles.is_empty());
        // (20 - 1) / 1.05 -> 19 layers
        let mut zs: Vec<f64> = s.particles.iter().map(|q| q.position.z).collect();
        zs.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        assert_eq!(zs.len(), 19);
        for q in &s.particles {
            assert_relative_eq!(q.velocity.x, -q.position.x / 5.0);
            assert_relative_eq!(q.velocity.y, -q.position.x / 5.0);
        }
        assert!(matches!(
            s.policy,
            ArmingPolicy::AfterSettle { axis: Axis::Z, margin, velocity, .. }
                if margin == 0.5 && velocity == -1.0
        ));
        assert_eq!(s.moving.rest_position(), Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(s.fixed.len(), 1);
    }

    #[test]
    fn test_moving_boundary_setup() {
        let p = params(r#", "scenario": "moving_boundary""#);
        let s = setup(&p);
        assert!(!s.particles.is_empty());
        for q in &s.particles {
            assert!(q.position.x.abs() <= 5.0 - 1.2 + 1e-9);
            assert!(q.position.z <= -8.0 + 2.0 - 1.2 + 1e-9);
            assert_eq!(q.velocity, Vec3::zeros());
        }
        assert_eq!(s.moving.rest_position(), Vec3::new(-15.0, 0.0, 0.0));
        assert!(matches!(s.policy, ArmingPolicy::PreArmed { axis: Axis::X, .. }));

        let opts = driver_options(&p);
        assert_eq!(opts.fps, 50.0);
        assert_eq!(opts.settle_time, 0.0);
        assert!(opts.initial_snapshot);
    }

    #[test]
    fn test_large_spheres_stay_off_the_walls() {
        // radius above the default 1.2 clearance
        let json = r#"{
            "scenario": "moving_boundary",
            "sphere_radius": 2.0,
            "sphere_density": 2.5,
            "box_X": 40.0,
            "box_Y": 40.0,
            "box_Z": 100.0,
            "step_size": 1e-4,
            "time_end": 1.0,
            "output_dir": "out"
        }"#;
        let s = setup(&SimParams::from_json(json).unwrap());
        assert!(!s.particles.is_empty());
        for q in &s.particles {
            let x = q.position;
            assert!(x.x.abs() + 2.0 <= 20.0 + 1e-9, "{x:?}");
            assert!(x.y.abs() + 2.0 <= 20.0 + 1e-9, "{x:?}");
            assert!(x.z - 2.0 >= -50.0 - 1e-9, "{x:?}");
        }
    }

    #[test]
    fn test_poisson_seed_selects_poisson_fill() {
        let a = setup(&params(r#", "scenario": "moving_boundary", "poisson_seed": 7"#));
        let b = setup(&params(r#", "scenario": "moving_boundary", "poisson_seed": 7"#));
        assert_eq!(a.particles, b.particles);
        let lattice = setup(&params(r#", "scenario": "moving_boundary""#));
        assert_ne!(a.particles, lattice.particles);
    }

    #[test]
    fn test_dem_params_mapping() {
        let p = params(r#", "normalStiffS2W": 3e6, "write_mode": "binary", "grav_Z": -981"#);
        let d = dem_params(&p);
        assert_eq!(d.wall.kn, 3e6);
        assert_eq!(d.sphere.kn, 1e7);
        assert_eq!(d.gravity, Vec3::new(0.0, 0.0, -981.0));
        assert_eq!(d.snapshot_format, SnapshotFormat::Binary);
        assert_eq!(d.domain, Vec3::new(10.0, 10.0, 20.0));
    }
}
