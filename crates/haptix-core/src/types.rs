use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

pub type Vec3 = DVec3;
pub type Quat = DQuat;
pub type Mat4 = DMat4;

/// Position + unit orientation, world frame unless stated otherwise. Meters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose { pub p: Vec3, pub q: Quat }

impl Pose {
    pub const IDENTITY: Pose = Pose { p: Vec3::ZERO, q: Quat::IDENTITY };

    #[inline] pub fn from_position(p: Vec3) -> Self { Self { p, q: Quat::IDENTITY } }
    #[inline] pub fn with_position(self, p: Vec3) -> Self { Self { p, q: self.q } }

    /// Local -> world transform. Orientation is renormalized on the way.
    #[inline] pub fn world_from_local(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.q.normalize(), self.p)
    }
}

impl Default for Pose {
    fn default() -> Self { Self::IDENTITY }
}

/// Linear RGB in [0,1], used only by presentation collaborators.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb { pub r: f32, pub g: f32, pub b: f32 }

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    #[inline] pub const fn new(r: f32, g: f32, b: f32) -> Self { Self { r, g, b } }
}

impl Default for Rgb {
    fn default() -> Self { Self::WHITE }
}
