use anyhow::Result;
use haptix_core::{EntityId, MeshId, PhysicsProps, Pose, Rgb, Role, Vec3};
use haptix_world::World;

use crate::config::Trajectory;

pub struct Scene {
    pub ground: EntityId,
    pub heavy: EntityId,
    pub light: EntityId,
    pub markers: [EntityId; Role::COUNT],
    pub props: Vec<(EntityId, PhysicsProps)>,
}

/// Marker mesh id for role gizmos. Mesh surfaces are ignored by contact and physics.
const MARKER_MESH: MeshId = MeshId(1);

pub fn build(w: &mut World) -> Result<Scene> {
    let ground = w.add_plane(Pose::IDENTITY, Rgb::new(0.35, 0.35, 0.38))?;
    let heavy = w.add_sphere(Pose::from_position(Vec3::new(0.2, 0.08, 0.0)), 0.08, Rgb::new(0.9, 0.3, 0.2))?;
    let light = w.add_sphere(Pose::from_position(Vec3::new(-0.2, 0.3, 0.05)), 0.05, Rgb::new(0.2, 0.6, 0.9))?;

    let mut markers = [EntityId(0); Role::COUNT];
    for role in Role::ALL {
        let id = w.add_tri_mesh(Pose::IDENTITY, MARKER_MESH, Rgb::WHITE)?;
        w.set_role(id, role);
        markers[role.index()] = id;
    }

    let props = vec![
        (heavy, PhysicsProps { density: 7800.0, restitution: 0.05, ..PhysicsProps::default() }),
        (light, PhysicsProps { mass: Some(0.05), linear_damping: 0.2, ..PhysicsProps::default() }),
    ];
    Ok(Scene { ground, heavy, light, markers, props })
}

pub fn device_pose(t: &Trajectory, time: f64) -> Pose {
    let w = std::f64::consts::TAU / t.period.max(1e-3);
    let a = w * time;
    Pose::from_position(Vec3::new(t.radius * a.cos(), t.height - t.dip * (2.0 * a).sin().abs(), t.radius * a.sin()))
}
