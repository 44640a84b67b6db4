use core::fmt;

/// Entity handle. Assigned by the World starting at 1, never reused.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(pub u32);
impl fmt::Display for EntityId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "EntityId({})", self.0) } }

/// Opaque mesh resource id owned by an external mesh cooker.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct MeshId(pub u32);
impl fmt::Display for MeshId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "MeshId({})", self.0) } }
