use haptix_core::EntityId;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("world is full ({capacity} surfaces)")]
    CapacityOverflow { capacity: usize },
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}
