use haptix_core::{EntityId, PhysicsCommand, Pose, SurfaceDef};

use crate::PropsTable;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub substeps: u32,
    pub dropped_s: f64,   // time discarded by the sub-step guard
}

/// Simulation backend driven by [`crate::PhysicsEngine`].
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Discard all bodies and recreate them from `surfaces`.
    fn rebuild(&mut self, surfaces: &[SurfaceDef], props: &PropsTable);

    /// False when the target is unknown or not dynamic.
    fn apply_wrench(&mut self, cmd: &PhysicsCommand) -> bool;

    /// Drops wrenches that have not been integrated yet.
    fn clear_wrenches(&mut self);

    fn advance(&mut self, dt: f64) -> StepStats;

    /// Appends current poses of dynamic bodies.
    fn write_back(&self, out: &mut Vec<(EntityId, Pose)>);

    /// Teleport (static/dynamic) or retarget (kinematic) after an external edit.
    fn sync_pose(&mut self, id: EntityId, pose: Pose);
}
