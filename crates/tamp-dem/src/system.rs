//! The sphere system and its engine-interface implementation.

use std::path::Path;

use tamp_engine::{
    BoundaryHandle, BoundaryKinematics, BoundarySpec, EngineError, Extreme, GranularEngine,
    Particle, Result,
};
use tamp_math::{Axis, Vec3};

use crate::grid::HashGrid;
use crate::params::{ContactModel, DemParams};
use crate::snapshot;

/// Steps shorter than this fraction of `step_size` are not split further.
const STEP_EPS: f64 = 1e-9;

struct Boundary {
    spec: BoundarySpec,
    kinematics: Option<BoundaryKinematics>,
    /// Force exerted by the particles during the latest internal step.
    reaction: Vec3,
}

impl Boundary {
    fn offset(&self, t: f64) -> Vec3 {
        self.kinematics.map(|k| k.offset(t)).unwrap_or_else(Vec3::zeros)
    }

    fn velocity(&self) -> Vec3 {
        self.kinematics.map(|k| k.velocity()).unwrap_or_else(Vec3::zeros)
    }
}

/// Wall contact seen from one particle: unit normal pointing toward the
/// particle, overlap depth, and wall velocity.
struct WallContact {
    normal: Vec3,
    depth: f64,
    wall_velocity: Vec3,
}

/// Equal-sphere DEM system.
pub struct DemSystem {
    params: DemParams,
    mass: f64,
    x: Vec<Vec3>,
    v: Vec<Vec3>,
    force: Vec<Vec3>,
    boundaries: Vec<Boundary>,
    grid: HashGrid,
    time: f64,
    contacts: usize,
    initialized: bool,
}

impl DemSystem {
    pub fn new(params: DemParams) -> Self {
        let mass = params.sphere_mass();
        let grid = HashGrid::new(2.0 * params.sphere_radius);
        Self {
            params,
            mass,
            x: Vec::new(),
            v: Vec::new(),
            force: Vec::new(),
            boundaries: Vec::new(),
            grid,
            time: 0.0,
            contacts: 0,
            initialized: false,
        }
    }

    pub fn params(&self) -> &DemParams {
        &self.params
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.x
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.v
    }

    fn boundary(&self, h: BoundaryHandle) -> Result<&Boundary> {
        self.boundaries.get(h.0).ok_or(EngineError::UnknownBoundary(h))
    }

    /// Total kinetic energy, in engine units.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.v.iter().map(|v| v.norm_squared()).sum::<f64>()
    }

    /// Fixed box walls plus registered boundaries touching particle `i`.
    /// Each entry carries the boundary index (`None` for box walls).
    fn wall_contacts(&self, i: usize, t: f64) -> Vec<(Option<usize>, WallContact)> {
        let r = self.params.sphere_radius;
        let x = self.x[i];
        let half = self.params.domain * 0.5;
        let mut out = Vec::new();

        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let a = axis.index();
            let lo = x[a] - r + half[a];
            if lo < 0.0 {
                let wall = WallContact {
                    normal: axis.unit(),
                    depth: -lo,
                    wall_velocity: Vec3::zeros(),
                };
                out.push((None, wall));
            }
            let hi = x[a] + r - half[a];
            if hi > 0.0 {
                let wall = WallContact {
                    normal: -axis.unit(),
                    depth: hi,
                    wall_velocity: Vec3::zeros(),
                };
                out.push((None, wall));
            }
        }

        for (b, boundary) in self.boundaries.iter().enumerate() {
            let offset = boundary.offset(t);
            let wall_velocity = boundary.velocity();
            match &boundary.spec {
                BoundarySpec::Plane {
                    position, normal, ..
                } => {
                    let n = normal.normalize();
                    let gap = (x - (position + offset)).dot(&n);
                    if gap < r {
                        let wall = WallContact {
                            normal: n,
                            depth: r - gap,
                            wall_velocity,
                        };
                        out.push((Some(b), wall));
                    }
                }
                BoundarySpec::CylinderZ { center, radius, .. } => {
                    let c = center + offset;
                    let radial = Vec3::new(x.x - c.x, x.y - c.y, 0.0);
                    let dist = radial.norm();
                    let depth = dist + r - radius;
                    if depth > 0.0 && dist > 0.0 {
                        let wall = WallContact {
                            normal: -radial / dist,
                            depth,
                            wall_velocity,
                        };
                        out.push((Some(b), wall));
                    }
                }
            }
        }
        out
    }

    /// Normal plus tangential contact force on the first body.
    ///
    /// `n` points from the second body toward the first; `rel_v` is the
    /// velocity of the first body relative to the second.
    fn contact_force(
        model: &ContactModel,
        n: &Vec3,
        depth: f64,
        rel_v: &Vec3,
        m_eff: f64,
        attraction: f64,
    ) -> Vec3 {
        let vn = rel_v.dot(n);
        let fn_mag = (model.kn * depth - model.gn * m_eff * vn).max(0.0);
        let vt = rel_v - n * vn;
        let mut ft = -vt * (model.gt * m_eff);
        let cap = model.mu * fn_mag;
        let ft_norm = ft.norm();
        if ft_norm > cap && ft_norm > 0.0 {
            ft *= cap / ft_norm;
        }
        n * (fn_mag - attraction) + ft
    }

    fn compute_forces(&mut self, t: f64) {
        let r = self.params.sphere_radius;
        let m = self.mass;
        let weight = m * self.params.gravity.norm();
        let gravity_force = self.params.gravity * m;

        for f in self.force.iter_mut() {
            *f = gravity_force;
        }
        for b in self.boundaries.iter_mut() {
            b.reaction = Vec3::zeros();
        }

        self.grid.rebuild(&self.x);
        let mut contacts = 0;
        let cohesion = self.params.cohesion_ratio * weight;
        for (i, j) in self.grid.candidate_pairs(&self.x) {
            let d = self.x[i] - self.x[j];
            let dist = d.norm();
            let depth = 2.0 * r - dist;
            if depth <= 0.0 || dist == 0.0 {
                continue;
            }
            contacts += 1;
            let n = d / dist;
            let rel_v = self.v[i] - self.v[j];
            let f = Self::contact_force(&self.params.sphere, &n, depth, &rel_v, 0.5 * m, cohesion);
            self.force[i] += f;
            self.force[j] -= f;
        }
        self.contacts = contacts;

        let adhesion = self.params.adhesion_ratio_s2w * weight;
        for i in 0..self.x.len() {
            for (owner, wall) in self.wall_contacts(i, t) {
                let rel_v = self.v[i] - wall.wall_velocity;
                let f = Self::contact_force(
                    &self.params.wall,
                    &wall.normal,
                    wall.depth,
                    &rel_v,
                    m,
                    adhesion,
                );
                self.force[i] += f;
                if let Some(b) = owner {
                    self.boundaries[b].reaction -= f;
                }
            }
        }
    }

    fn substep(&mut self, t: f64, h: f64) {
        self.compute_forces(t);
        let inv_m = 1.0 / self.mass;
        for ((x, v), f) in self.x.iter_mut().zip(self.v.iter_mut()).zip(&self.force) {
            *v += f * (inv_m * h);
            *x += *v * h;
        }
    }
}

impl GranularEngine for DemSystem {
    fn load_particles(&mut self, particles: &[Particle]) -> Result<()> {
        if self.initialized {
            return Err(EngineError::Backend(
                "particles must be loaded before initialize()".to_string(),
            ));
        }
        self.x = particles.iter().map(|p| p.position).collect();
        self.v = particles.iter().map(|p| p.velocity).collect();
        self.force = vec![Vec3::zeros(); particles.len()];
        Ok(())
    }

    fn create_boundary(&mut self, spec: BoundarySpec) -> Result<BoundaryHandle> {
        let handle = BoundaryHandle(self.boundaries.len());
        self.boundaries.push(Boundary {
            spec,
            kinematics: None,
            reaction: Vec3::zeros(),
        });
        Ok(handle)
    }

    fn set_boundary_kinematics(
        &mut self,
        boundary: BoundaryHandle,
        kinematics: BoundaryKinematics,
    ) -> Result<()> {
        let b = self
            .boundaries
            .get_mut(boundary.0)
            .ok_or(EngineError::UnknownBoundary(boundary))?;
        b.kinematics = Some(kinematics);
        Ok(())
    }

    fn boundary_kinematics_mut(
        &mut self,
        boundary: BoundaryHandle,
    ) -> Result<&mut BoundaryKinematics> {
        self.boundaries
            .get_mut(boundary.0)
            .and_then(|b| b.kinematics.as_mut())
            .ok_or(EngineError::UnknownBoundary(boundary))
    }

    fn initialize(&mut self) -> Result<()> {
        if self.x.is_empty() {
            return Err(EngineError::NoParticles);
        }
        if !(self.params.step_size > 0.0) {
            return Err(EngineError::InvalidStep(self.params.step_size));
        }
        self.initialized = true;
        log::info!(
            "dem system: {} spheres (r = {}, m = {:.4e}), {} boundaries, step {:e}",
            self.x.len(),
            self.params.sphere_radius,
            self.mass,
            self.boundaries.len(),
            self.params.step_size
        );
        Ok(())
    }

    fn advance(&mut self, dt: f64) -> Result<()> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(EngineError::InvalidStep(dt));
        }
        let n = (dt / self.params.step_size - STEP_EPS).ceil().max(1.0) as u64;
        let h = dt / n as f64;
        let start = self.time;
        for k in 0..n {
            self.substep(start + k as f64 * h, h);
        }
        self.time = start + dt;

        if self.x.iter().chain(&self.v).any(|p| !p.iter().all(|c| c.is_finite())) {
            return Err(EngineError::Diverged { time: self.time });
        }
        Ok(())
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn num_particles(&self) -> usize {
        self.x.len()
    }

    fn particle_extreme(&self, axis: Axis, which: Extreme) -> Option<f64> {
        let values = self.x.iter().map(|x| axis.component(x));
        match which {
            Extreme::Max => values.reduce(f64::max),
            Extreme::Min => values.reduce(f64::min),
        }
    }

    fn contact_count(&self) -> usize {
        self.contacts
    }

    fn boundary_position(&self, boundary: BoundaryHandle) -> Result<Vec3> {
        let b = self.boundary(boundary)?;
        Ok(b.spec.rest_position() + b.offset(self.time))
    }

    fn boundary_reaction_force(&self, boundary: BoundaryHandle) -> Result<Vec3> {
        let b = self.boundary(boundary)?;
        if !b.spec.tracks_forces() {
            log::warn!("{boundary} does not track forces; reporting zero");
            return Ok(Vec3::zeros());
        }
        Ok(b.reaction)
    }

    fn write_snapshot(&self, path: &Path) -> Result<()> {
        snapshot::write(self.params.snapshot_format, path, &self.x, &self.v)?;
        Ok(())
    }
}
