use std::collections::HashMap;

use haptix_core::{EntityId, PhysicsProps};

/// Per-entity props with a default fallback.
#[derive(Clone, Debug, Default)]
pub struct PropsTable { map: HashMap<EntityId, PhysicsProps> }

impl PropsTable {
    pub fn new() -> Self { Self::default() }
    pub fn set(&mut self, id: EntityId, p: PhysicsProps) { self.map.insert(id, p); }
    pub fn get(&self, id: EntityId) -> PhysicsProps { self.map.get(&id).copied().unwrap_or_default() }
}
