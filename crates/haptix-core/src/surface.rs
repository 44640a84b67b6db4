use serde::{Deserialize, Serialize};

use crate::{EntityId, MeshId, Pose, Rgb};

/// Surface payload. Plane is local +Y with offset 0; placement comes from the pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SurfaceKind {
    Plane,
    Sphere { radius: f64 },
    TriMesh { mesh: MeshId },
}

impl SurfaceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceKind::Plane => "plane",
            SurfaceKind::Sphere { .. } => "sphere",
            SurfaceKind::TriMesh { .. } => "trimesh",
        }
    }
}

/// Closed role set. At most one entity holds each role.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Role { Tool = 0, Proxy = 1, Reference = 2 }

impl Role {
    pub const COUNT: usize = 3;
    pub const ALL: [Role; Role::COUNT] = [Role::Tool, Role::Proxy, Role::Reference];
    #[inline] pub fn index(self) -> usize { self as usize }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceDef {
    pub id: EntityId,
    pub kind: SurfaceKind,
    pub pose: Pose,
    pub colour: Rgb,
    pub role: Option<Role>,
}

impl SurfaceDef {
    /// Filler for unused snapshot slots.
    pub const EMPTY: SurfaceDef = SurfaceDef {
        id: EntityId(0),
        kind: SurfaceKind::Plane,
        pose: Pose::IDENTITY,
        colour: Rgb::WHITE,
        role: None,
    };
}

impl Default for SurfaceDef {
    fn default() -> Self { Self::EMPTY }
}
