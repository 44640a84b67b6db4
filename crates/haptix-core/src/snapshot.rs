use crate::{EntityId, Pose, SurfaceDef, Vec3};

pub const WORLD_SNAPSHOT_CAPACITY: usize = 256;

/// Fixed-capacity copy of the world's surfaces. Only `surfaces[..count]` is meaningful.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub timestamp: f64,
    pub surfaces: [SurfaceDef; WORLD_SNAPSHOT_CAPACITY],
    pub count: u32,
}

impl WorldSnapshot {
    pub const EMPTY: WorldSnapshot = WorldSnapshot {
        timestamp: 0.0,
        surfaces: [SurfaceDef::EMPTY; WORLD_SNAPSHOT_CAPACITY],
        count: 0,
    };

    #[inline] pub fn len(&self) -> usize { self.count as usize }
    #[inline] pub fn is_empty(&self) -> bool { self.count == 0 }
    #[inline] pub fn surfaces(&self) -> &[SurfaceDef] { &self.surfaces[..self.len()] }

    /// Appends `s`; returns false (and leaves the snapshot untouched) when full.
    pub fn push(&mut self, s: SurfaceDef) -> bool {
        let n = self.len();
        if n >= WORLD_SNAPSHOT_CAPACITY { return false; }
        self.surfaces[n] = s;
        self.count += 1;
        true
    }

    pub fn find(&self, id: EntityId) -> Option<&SurfaceDef> {
        self.surfaces().iter().find(|s| s.id == id)
    }
}

impl Default for WorldSnapshot {
    fn default() -> Self { Self::EMPTY }
}

/// Device-side input. Written by the device I/O collaborator.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ToolIn {
    pub device_pose: Pose,
    pub reference_pose: Pose,
    pub timestamp: f64,
}

/// Haptic loop output for the device. Force in device frame (identity to world).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ToolOut {
    pub proxy_pose: Pose,
    pub force_device: Vec3,
    pub timestamp: f64,
}

/// Read-only copy for visualization and logging.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HapticSnapshot {
    pub device_pose: Pose,
    pub reference_pose: Pose,
    pub proxy_pose: Pose,
    pub force_world: Vec3,
    pub timestamp: f64,
}
