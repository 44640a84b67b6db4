use haptix_bus::{BusError, RingProducer};
use haptix_core::{EntityId, Pose, Quat, Rgb, Role, Vec3};

/// Mutation routed to the World owner from another thread.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum WorldEdit {
    SetPose { id: EntityId, pose: Pose },
    SetColour { id: EntityId, colour: Rgb },
    SetRole { id: EntityId, role: Role },
    ClearRole { role: Role },
    Translate { id: EntityId, delta: Vec3 },
    Rotate { id: EntityId, dq: Quat },
}

impl WorldEdit {
    /// Target of edits that move a surface.
    pub fn moved_id(&self) -> Option<EntityId> {
        match *self {
            WorldEdit::SetPose { id, .. } | WorldEdit::Translate { id, .. } | WorldEdit::Rotate { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// UI/authoring side handle. Edits are applied on the owner's next drain.
pub struct WorldEditor {
    pub(crate) tx: RingProducer<WorldEdit>,
}

impl WorldEditor {
    pub fn send(&mut self, e: WorldEdit) -> Result<(), BusError> {
        let capacity = self.tx.capacity();
        self.tx.push(e).map_err(|_| BusError::Full { capacity })
    }

    pub fn set_pose(&mut self, id: EntityId, pose: Pose) -> Result<(), BusError> { self.send(WorldEdit::SetPose { id, pose }) }
    pub fn set_colour(&mut self, id: EntityId, colour: Rgb) -> Result<(), BusError> { self.send(WorldEdit::SetColour { id, colour }) }
    pub fn set_role(&mut self, id: EntityId, role: Role) -> Result<(), BusError> { self.send(WorldEdit::SetRole { id, role }) }
    pub fn clear_role(&mut self, role: Role) -> Result<(), BusError> { self.send(WorldEdit::ClearRole { role }) }
    pub fn translate(&mut self, id: EntityId, delta: Vec3) -> Result<(), BusError> { self.send(WorldEdit::Translate { id, delta }) }
    pub fn rotate(&mut self, id: EntityId, dq: Quat) -> Result<(), BusError> { self.send(WorldEdit::Rotate { id, dq }) }
}
