use haptix_bus::{Reader, SlotReader};
use haptix_core::{EntityId, Pose, WorldSnapshot};

/// Read side of the World. Cheap to clone, safe to hand to any thread.
#[derive(Clone)]
pub struct WorldReader {
    pub(crate) snapshot: Reader<WorldSnapshot>,
    pub(crate) poses: SlotReader<Option<(EntityId, Pose)>>,
}

impl WorldReader {
    /// Never blocks. Before the first publish this is an empty snapshot.
    pub fn read_snapshot(&self) -> WorldSnapshot { self.snapshot.read() }

    /// (version, snapshot); version 0 means nothing was published yet.
    pub fn read_versioned(&self) -> (u64, WorldSnapshot) { self.snapshot.read_versioned() }

    /// Latest pose written by the owner, ahead of the next snapshot.
    pub fn live_pose(&self, id: EntityId) -> Option<Pose> {
        // slots fill in insertion order: ids ascend, empty slots trail
        let (mut lo, mut hi) = (0, self.poses.len());
        while lo < hi {
            let mid = (lo + hi) / 2;
            match self.poses.try_read(mid).flatten() {
                Some((slot_id, pose)) if slot_id == id => return Some(pose),
                Some((slot_id, _)) if slot_id < id => lo = mid + 1,
                _ => hi = mid,
            }
        }
        None
    }
}
