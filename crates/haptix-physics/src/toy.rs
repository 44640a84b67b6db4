use haptix_core::{EntityId, PhysicsCommand, Pose, SurfaceDef, Vec3};
use tracing::debug;

use crate::{Backend, BodyClass, PhysicsParams, PropsTable, StepStats};

#[derive(Copy, Clone, Debug)]
struct ToyBody { id: EntityId, class: BodyClass, pose: Pose, pending: Vec3 }

/// Wrench-as-displacement integrator. No mass, no inertia, no gravity.
#[derive(Clone, Debug)]
pub struct ToyIntegrator {
    mobility: f64,
    max_step: f64,
    bodies: Vec<ToyBody>,
}

impl ToyIntegrator {
    pub fn new(params: &PhysicsParams) -> Self {
        Self { mobility: params.mobility, max_step: params.max_step, bodies: Vec::new() }
    }

    /// `dp = mobility * F * duration`, before clamping.
    #[inline] pub fn raw_displacement(&self, force: Vec3, duration: f64) -> Vec3 {
        force * (self.mobility * duration)
    }

    /// Raw displacement clamped to `max_step`.
    pub fn displacement(&self, force: Vec3, duration: f64) -> Vec3 {
        let dp = self.raw_displacement(force, duration);
        let len2 = dp.length_squared();
        if len2 > self.max_step * self.max_step {
            dp * (self.max_step / len2.sqrt().max(1e-12))
        } else {
            dp
        }
    }
}

impl Backend for ToyIntegrator {
    fn name(&self) -> &'static str { "toy" }

    fn rebuild(&mut self, surfaces: &[SurfaceDef], props: &PropsTable) {
        self.bodies = surfaces.iter()
            .map(|s| ToyBody { id: s.id, class: BodyClass::of(&s.kind, &props.get(s.id)), pose: s.pose, pending: Vec3::ZERO })
            .collect();
        debug!(bodies = self.bodies.len(), "toy rebuild");
    }

    fn apply_wrench(&mut self, cmd: &PhysicsCommand) -> bool {
        let dp = self.displacement(cmd.force, cmd.duration);
        match self.bodies.iter_mut().find(|b| b.id == cmd.target) {
            Some(b) if b.class == BodyClass::Dynamic => { b.pending += dp; true }
            _ => false,
        }
    }

    fn clear_wrenches(&mut self) {
        for b in &mut self.bodies { b.pending = Vec3::ZERO; }
    }

    fn advance(&mut self, _dt: f64) -> StepStats {
        for b in self.bodies.iter_mut().filter(|b| b.class == BodyClass::Dynamic) {
            b.pose.p += b.pending;
            b.pending = Vec3::ZERO;
        }
        StepStats { substeps: 1, dropped_s: 0.0 }
    }

    fn write_back(&self, out: &mut Vec<(EntityId, Pose)>) {
        out.extend(self.bodies.iter().filter(|b| b.class == BodyClass::Dynamic).map(|b| (b.id, b.pose)));
    }

    fn sync_pose(&mut self, id: EntityId, pose: Pose) {
        if let Some(b) = self.bodies.iter_mut().find(|b| b.id == id) { b.pose = pose; }
    }
}
