use haptix_core::{EntityId, PhysicsCommand, PhysicsProps, Pose, Quat, SurfaceDef, SurfaceKind, Vec3};
use rapier3d_f64::na::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};
use rapier3d_f64::prelude::*;
use tracing::{debug, warn};

use crate::{Backend, BodyClass, PhysicsParams, PropsTable, StepStats};

/* ---- glam <-> nalgebra ---- */

#[inline] fn to_vector(v: Vec3) -> Vector3<Real> { Vector3::new(v.x, v.y, v.z) }
#[inline] fn to_point(v: Vec3) -> Point3<Real> { Point3::new(v.x, v.y, v.z) }

fn to_iso(p: &Pose) -> Isometry3<Real> {
    let q = p.q.normalize();
    Isometry3::from_parts(
        Translation3::new(p.p.x, p.p.y, p.p.z),
        UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

fn from_iso(iso: &Isometry3<Real>) -> Pose {
    let t = iso.translation.vector;
    let r = iso.rotation;
    Pose { p: Vec3::new(t.x, t.y, t.z), q: Quat::from_xyzw(r.i, r.j, r.k, r.w) }
}

/* ---- backend ---- */

// Ground slab standing in for an infinite plane. Its top face is the plane.
const GROUND_HALF_EXTENT: Real = 500.0;
const GROUND_HALF_THICKNESS: Real = 0.5;

#[derive(Copy, Clone, Debug)]
struct Actor { id: EntityId, handle: RigidBodyHandle, class: BodyClass }

/// Rigid-body backend on rapier, sub-stepped at a fixed rate.
pub struct RapierBackend {
    gravity: Vector3<Real>,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    actors: Vec<Actor>,
    fixed_dt: f64,
    max_substeps: u32,
    acc: f64,
    forces_pending: bool,
}

impl RapierBackend {
    pub fn new(params: &PhysicsParams) -> Self {
        let integration = IntegrationParameters { dt: params.fixed_dt, ..IntegrationParameters::default() };
        Self {
            gravity: to_vector(params.gravity),
            integration,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            actors: Vec::new(),
            fixed_dt: params.fixed_dt,
            max_substeps: params.max_substeps.max(1),
            acc: 0.0,
            forces_pending: false,
        }
    }

    #[inline] pub fn accumulator(&self) -> f64 { self.acc }
    #[inline] pub fn actor_count(&self) -> usize { self.actors.len() }

    pub fn class_of(&self, id: EntityId) -> Option<BodyClass> {
        self.actor(id).map(|a| a.class)
    }

    /// Linear velocity of a tracked body.
    pub fn velocity(&self, id: EntityId) -> Option<Vec3> {
        let a = self.actor(id)?;
        let v = self.bodies.get(a.handle)?.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    fn actor(&self, id: EntityId) -> Option<&Actor> { self.actors.iter().find(|a| a.id == id) }

    fn step_once(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    fn clear_forces(&mut self) {
        for a in self.actors.iter().filter(|a| a.class == BodyClass::Dynamic) {
            if let Some(b) = self.bodies.get_mut(a.handle) { b.reset_forces(false); }
        }
        self.forces_pending = false;
    }

    fn insert(&mut self, s: &SurfaceDef, class: BodyClass, props: &PhysicsProps) -> Option<RigidBodyHandle> {
        let iso = to_iso(&s.pose);
        let (body, collider) = match s.kind {
            SurfaceKind::Plane => (
                RigidBodyBuilder::fixed().position(iso).build(),
                ColliderBuilder::cuboid(GROUND_HALF_EXTENT, GROUND_HALF_THICKNESS, GROUND_HALF_EXTENT)
                    .translation(Vector3::new(0.0, -GROUND_HALF_THICKNESS, 0.0)),
            ),
            SurfaceKind::Sphere { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    warn!(id = s.id.0, radius, "sphere with invalid radius not instantiated");
                    return None;
                }
                let builder = match class {
                    BodyClass::Kinematic => RigidBodyBuilder::kinematic_position_based(),
                    BodyClass::Static => RigidBodyBuilder::fixed(),
                    _ => RigidBodyBuilder::dynamic(),
                };
                let body = builder
                    .position(iso)
                    .linear_damping(props.linear_damping)
                    .angular_damping(props.angular_damping)
                    .ccd_enabled(class == BodyClass::Dynamic)
                    .build();
                (body, ColliderBuilder::ball(radius).mass(props.sphere_mass(radius)))
            }
            SurfaceKind::TriMesh { .. } => return None,
        };
        // single friction coefficient: the sliding one
        let collider = collider.friction(props.dynamic_friction).restitution(props.restitution).build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        Some(handle)
    }
}

impl Backend for RapierBackend {
    fn name(&self) -> &'static str { "rapier" }

    fn rebuild(&mut self, surfaces: &[SurfaceDef], props: &PropsTable) {
        self.islands = IslandManager::new();
        self.broad_phase = DefaultBroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ccd = CCDSolver::new();
        self.actors.clear();
        self.forces_pending = false;

        for s in surfaces {
            let p = props.get(s.id);
            let class = BodyClass::of(&s.kind, &p);
            if class == BodyClass::Unsupported { continue; }
            if let Some(handle) = self.insert(s, class, &p) {
                self.actors.push(Actor { id: s.id, handle, class });
            }
        }
        debug!(actors = self.actors.len(), surfaces = surfaces.len(), "rapier rebuild");
    }

    fn apply_wrench(&mut self, cmd: &PhysicsCommand) -> bool {
        let Some(a) = self.actor(cmd.target).copied() else { return false };
        if a.class != BodyClass::Dynamic { return false; }
        let Some(b) = self.bodies.get_mut(a.handle) else { return false };
        b.add_force_at_point(to_vector(cmd.force), to_point(cmd.point), true);
        self.forces_pending = true;
        true
    }

    fn clear_wrenches(&mut self) {
        if self.forces_pending { self.clear_forces(); }
    }

    fn advance(&mut self, dt: f64) -> StepStats {
        self.acc += dt.max(0.0);
        let mut n = 0;
        while self.acc >= self.fixed_dt && n < self.max_substeps {
            self.step_once();
            self.acc -= self.fixed_dt;
            n += 1;
            // a force command acts for one sub-step
            if self.forces_pending { self.clear_forces(); }
        }
        let mut dropped_s = 0.0;
        if self.acc >= self.fixed_dt {
            dropped_s = self.acc - self.acc % self.fixed_dt;
            self.acc -= dropped_s;
            warn!(substeps = n, dropped_s, "physics fell behind, time dropped");
        }
        StepStats { substeps: n, dropped_s }
    }

    fn write_back(&self, out: &mut Vec<(EntityId, Pose)>) {
        for a in self.actors.iter().filter(|a| a.class == BodyClass::Dynamic) {
            if let Some(b) = self.bodies.get(a.handle) { out.push((a.id, from_iso(b.position()))); }
        }
    }

    fn sync_pose(&mut self, id: EntityId, pose: Pose) {
        let Some(a) = self.actor(id).copied() else { return };
        let Some(b) = self.bodies.get_mut(a.handle) else { return };
        match a.class {
            BodyClass::Kinematic => b.set_next_kinematic_position(to_iso(&pose)),
            _ => b.set_position(to_iso(&pose), true),
        }
    }
}
