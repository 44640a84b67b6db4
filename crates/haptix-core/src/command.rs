use crate::{EntityId, Vec3};

pub const MAX_COMMANDS_PER_TICK: usize = 8;

/// Wrench at a world point, held for `duration` seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PhysicsCommand {
    pub target: EntityId,
    pub force: Vec3,
    pub point: Vec3,
    pub duration: f64,
    pub timestamp: f64,
}

/// One haptic tick's commands. `seq` is the producing tick (0 = nothing published yet).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicsCommandList {
    pub seq: u64,
    pub timestamp: f64,
    len: u8,
    cmds: [PhysicsCommand; MAX_COMMANDS_PER_TICK],
}

impl PhysicsCommandList {
    pub fn new(seq: u64, timestamp: f64) -> Self {
        Self { seq, timestamp, len: 0, cmds: [PhysicsCommand::default(); MAX_COMMANDS_PER_TICK] }
    }

    pub fn push(&mut self, c: PhysicsCommand) -> bool {
        let n = self.len as usize;
        if n >= MAX_COMMANDS_PER_TICK { return false; }
        self.cmds[n] = c;
        self.len += 1;
        true
    }

    #[inline] pub fn commands(&self) -> &[PhysicsCommand] { &self.cmds[..self.len as usize] }
    #[inline] pub fn len(&self) -> usize { self.len as usize }
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }
}

impl Default for PhysicsCommandList {
    fn default() -> Self { Self::new(0, 0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_stops_at_capacity() {
        let mut l = PhysicsCommandList::new(3, 0.5);
        for _ in 0..MAX_COMMANDS_PER_TICK { assert!(l.push(PhysicsCommand::default())); }
        assert!(!l.push(PhysicsCommand::default()));
        assert_eq!(l.len(), MAX_COMMANDS_PER_TICK);
        assert_eq!(l.seq, 3);
    }
}
