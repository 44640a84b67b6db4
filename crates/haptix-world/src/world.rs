use haptix_bus::{DoubleBuffer, EditRing, Publisher, RingConsumer, SeqlockSlots, SlotWriter};
use haptix_core::{
    EntityId, MeshId, Pose, Quat, Rgb, Role, SurfaceDef, SurfaceKind, Vec3, WorldSnapshot,
    WORLD_SNAPSHOT_CAPACITY,
};
use tracing::{debug, warn};

use crate::{WorldEdit, WorldEditor, WorldError, WorldReader};

/// Live pose slots, one per surface in insertion order.
pub const LIVE_POSE_SLOTS: usize = WORLD_SNAPSHOT_CAPACITY;

/// Authoritative entity/surface store. The owning thread is the only
/// publisher; everyone else reads through [`WorldReader`] and writes through
/// [`WorldEditor`].
pub struct World {
    next_id: u32,
    entities: Vec<EntityId>,
    surfaces: Vec<SurfaceDef>,
    roles: [Option<EntityId>; Role::COUNT],
    snapshot: Publisher<WorldSnapshot>,
    poses: SlotWriter<Option<(EntityId, Pose)>>,
    reader: WorldReader,
    edits: Option<RingConsumer<WorldEdit>>,
    moved: Vec<EntityId>,
}

impl Default for World {
    fn default() -> Self { Self::new() }
}

impl World {
    pub fn new() -> Self {
        let (snapshot, snap_rx) = DoubleBuffer::new(WorldSnapshot::EMPTY);
        let (poses, pose_rx) = SeqlockSlots::new(LIVE_POSE_SLOTS, None);
        Self {
            next_id: 1,
            entities: Vec::new(),
            surfaces: Vec::new(),
            roles: [None; Role::COUNT],
            snapshot,
            poses,
            reader: WorldReader { snapshot: snap_rx, poses: pose_rx },
            edits: None,
            moved: Vec::new(),
        }
    }

    pub fn reader(&self) -> WorldReader { self.reader.clone() }

    /// New edit channel. Replaces any previous editor's channel.
    pub fn editor(&mut self, capacity: usize) -> WorldEditor {
        let (tx, rx) = EditRing::new(capacity);
        self.edits = Some(rx);
        WorldEditor { tx }
    }

    /* ---- creation ---- */

    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(id);
        id
    }

    pub fn add_plane(&mut self, pose: Pose, colour: Rgb) -> Result<EntityId, WorldError> {
        self.add_surface(SurfaceKind::Plane, pose, colour)
    }

    /// Radius validity is checked where the SDF is built, not here.
    pub fn add_sphere(&mut self, pose: Pose, radius: f64, colour: Rgb) -> Result<EntityId, WorldError> {
        self.add_surface(SurfaceKind::Sphere { radius }, pose, colour)
    }

    pub fn add_tri_mesh(&mut self, pose: Pose, mesh: MeshId, colour: Rgb) -> Result<EntityId, WorldError> {
        self.add_surface(SurfaceKind::TriMesh { mesh }, pose, colour)
    }

    fn add_surface(&mut self, kind: SurfaceKind, pose: Pose, colour: Rgb) -> Result<EntityId, WorldError> {
        if self.surfaces.len() >= WORLD_SNAPSHOT_CAPACITY {
            warn!(kind = kind.name(), capacity = WORLD_SNAPSHOT_CAPACITY, "surface rejected: world full");
            return Err(WorldError::CapacityOverflow { capacity: WORLD_SNAPSHOT_CAPACITY });
        }
        let id = self.create_entity();
        self.surfaces.push(SurfaceDef { id, kind, pose, colour, role: None });
        self.poses.write(self.surfaces.len() - 1, Some((id, pose)));
        Ok(id)
    }

    /* ---- lookup ---- */

    #[inline] pub fn entities(&self) -> &[EntityId] { &self.entities }
    #[inline] pub fn surfaces(&self) -> &[SurfaceDef] { &self.surfaces }
    #[inline] pub fn len(&self) -> usize { self.surfaces.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.surfaces.is_empty() }

    pub fn surface(&self, id: EntityId) -> Option<&SurfaceDef> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn try_surface(&self, id: EntityId) -> Result<&SurfaceDef, WorldError> {
        self.surface(id).ok_or(WorldError::UnknownEntity(id))
    }

    fn surface_mut(&mut self, id: EntityId) -> Option<&mut SurfaceDef> {
        self.surfaces.iter_mut().find(|s| s.id == id)
    }

    fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.surfaces.iter().position(|s| s.id == id)
    }

    #[inline] pub fn entity_for(&self, role: Role) -> Option<EntityId> { self.roles[role.index()] }

    /* ---- mutation (unknown ids return false) ---- */

    pub fn set_pose(&mut self, id: EntityId, pose: Pose) -> bool {
        let Some(s) = self.surface_mut(id) else { return false };
        s.pose = pose;
        self.write_live_pose(id, pose);
        true
    }

    /// Batched pose write-back; returns how many ids were known.
    pub fn set_poses(&mut self, items: &[(EntityId, Pose)]) -> usize {
        let mut live = Vec::with_capacity(items.len());
        for &(id, pose) in items {
            let Some(i) = self.slot_of(id) else { continue };
            self.surfaces[i].pose = pose;
            live.push((i, Some((id, pose))));
        }
        self.poses.write_batch(&live);
        live.len()
    }

    pub fn set_colour(&mut self, id: EntityId, colour: Rgb) -> bool {
        let Some(s) = self.surface_mut(id) else { return false };
        s.colour = colour;
        true
    }

    /// The previous holder of `role`, if any, loses it.
    pub fn set_role(&mut self, id: EntityId, role: Role) -> bool {
        if self.surface(id).is_none() { return false; }
        if let Some(prev) = self.roles[role.index()].filter(|p| *p != id) {
            if let Some(s) = self.surface_mut(prev) { s.role = None; }
        }
        if let Some(old) = self.surface(id).and_then(|s| s.role).filter(|r| *r != role) {
            self.roles[old.index()] = None;
        }
        if let Some(s) = self.surface_mut(id) { s.role = Some(role); }
        self.roles[role.index()] = Some(id);
        true
    }

    pub fn clear_role(&mut self, role: Role) -> bool {
        let Some(holder) = self.roles[role.index()].take() else { return false };
        if let Some(s) = self.surface_mut(holder) { s.role = None; }
        true
    }

    pub fn translate(&mut self, id: EntityId, delta: Vec3) -> bool {
        let Some(s) = self.surface_mut(id) else { return false };
        s.pose.p += delta;
        let pose = s.pose;
        self.write_live_pose(id, pose);
        true
    }

    /// `q' = normalize(dq * q)`.
    pub fn rotate(&mut self, id: EntityId, dq: Quat) -> bool {
        let Some(s) = self.surface_mut(id) else { return false };
        s.pose.q = (dq * s.pose.q).normalize();
        let pose = s.pose;
        self.write_live_pose(id, pose);
        true
    }

    pub fn apply(&mut self, e: WorldEdit) -> bool {
        match e {
            WorldEdit::SetPose { id, pose } => self.set_pose(id, pose),
            WorldEdit::SetColour { id, colour } => self.set_colour(id, colour),
            WorldEdit::SetRole { id, role } => self.set_role(id, role),
            WorldEdit::ClearRole { role } => self.clear_role(role),
            WorldEdit::Translate { id, delta } => self.translate(id, delta),
            WorldEdit::Rotate { id, dq } => self.rotate(id, dq),
        }
    }

    /// Drains the editor channel; returns the number of edits drained.
    pub fn apply_pending_edits(&mut self) -> usize {
        let Some(mut rx) = self.edits.take() else { return 0 };
        let mut n = 0;
        while let Some(e) = rx.pop() {
            n += 1;
            if !self.apply(e) {
                debug!(?e, "edit ignored");
                continue;
            }
            if let Some(id) = e.moved_id().filter(|id| !self.moved.contains(id)) {
                self.moved.push(id);
            }
        }
        self.edits = Some(rx);
        n
    }

    /// Ids moved by edits since the last drain.
    pub fn drain_moved(&mut self) -> std::vec::Drain<'_, EntityId> { self.moved.drain(..) }

    /* ---- publication ---- */

    pub fn build_snapshot(&self, timestamp: f64) -> WorldSnapshot {
        let mut snap = WorldSnapshot { timestamp, ..WorldSnapshot::EMPTY };
        for s in &self.surfaces {
            // add_surface caps the list, so this never fails
            let _ = snap.push(*s);
        }
        snap
    }

    /// Sole producer call. Returns the published version.
    pub fn publish_snapshot(&mut self, timestamp: f64) -> u64 {
        let snap = self.build_snapshot(timestamp);
        self.snapshot.write(snap);
        debug!(version = self.snapshot.version(), count = snap.count, timestamp, "world snapshot published");
        self.snapshot.version()
    }

    fn write_live_pose(&mut self, id: EntityId, pose: Pose) {
        if let Some(i) = self.slot_of(id) { self.poses.write(i, Some((id, pose))); }
    }
}

/// Position of `id` within `snap.surfaces[..count]`.
pub fn find_surface_index(snap: &WorldSnapshot, id: EntityId) -> Option<usize> {
    snap.surfaces().iter().position(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unknown_ids_fail_quietly() {
        let mut w = World::new();
        let ghost = EntityId(42);
        assert!(!w.set_pose(ghost, Pose::IDENTITY));
        assert!(!w.set_colour(ghost, Rgb::BLACK));
        assert!(!w.set_role(ghost, Role::Tool));
        assert!(!w.translate(ghost, Vec3::X));
        assert!(!w.rotate(ghost, Quat::IDENTITY));
        assert_eq!(w.try_surface(ghost), Err(WorldError::UnknownEntity(ghost)));
    }

    #[test]
    fn ids_start_at_one_and_never_repeat() {
        let mut w = World::new();
        let a = w.create_entity();
        let b = w.add_plane(Pose::IDENTITY, Rgb::WHITE).unwrap();
        let c = w.add_sphere(Pose::IDENTITY, 0.1, Rgb::WHITE).unwrap();
        assert_eq!((a, b, c), (EntityId(1), EntityId(2), EntityId(3)));
        assert_eq!(w.entities().len(), 3);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn roles_stay_unique() {
        let mut w = World::new();
        let a = w.add_sphere(Pose::IDENTITY, 0.1, Rgb::WHITE).unwrap();
        let b = w.add_sphere(Pose::IDENTITY, 0.1, Rgb::WHITE).unwrap();
        assert_eq!(w.entity_for(Role::Proxy), None);
        assert!(w.set_role(a, Role::Proxy));
        assert!(w.set_role(b, Role::Proxy));
        assert_eq!(w.entity_for(Role::Proxy), Some(b));
        assert_eq!(w.surface(a).unwrap().role, None);

        // switching b's role frees Proxy
        assert!(w.set_role(b, Role::Tool));
        assert_eq!(w.entity_for(Role::Proxy), None);
        assert_eq!(w.entity_for(Role::Tool), Some(b));
        assert!(w.clear_role(Role::Tool));
        assert!(!w.clear_role(Role::Tool));
        assert_eq!(w.surface(b).unwrap().role, None);
    }

    #[test]
    fn rotate_left_multiplies_and_normalizes() {
        let mut w = World::new();
        let q0 = Quat::from_rotation_y(0.3);
        let id = w.add_sphere(Pose { p: Vec3::ZERO, q: q0 }, 0.1, Rgb::WHITE).unwrap();
        let dq = Quat::from_rotation_x(0.5) * 1.5; // deliberately non-unit
        assert!(w.rotate(id, dq));
        let q = w.surface(id).unwrap().pose.q;
        assert_relative_eq!(q.length(), 1.0, epsilon = 1e-12);
        let want = (Quat::from_rotation_x(0.5) * q0).normalize();
        assert_relative_eq!(q.dot(want), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn capacity_overflow_rejects_without_consuming_an_id() {
        let mut w = World::new();
        for _ in 0..WORLD_SNAPSHOT_CAPACITY { w.add_plane(Pose::IDENTITY, Rgb::WHITE).unwrap(); }
        assert_eq!(w.add_sphere(Pose::IDENTITY, 0.1, Rgb::WHITE),
                   Err(WorldError::CapacityOverflow { capacity: WORLD_SNAPSHOT_CAPACITY }));
        w.publish_snapshot(0.0);
        assert_eq!(w.reader().read_snapshot().len(), WORLD_SNAPSHOT_CAPACITY);
        assert_eq!(w.create_entity(), EntityId(WORLD_SNAPSHOT_CAPACITY as u32 + 1));
    }

    #[test]
    fn live_pose_tracks_mutations_before_publish() {
        let mut w = World::new();
        let r = w.reader();
        let id = w.add_sphere(Pose::IDENTITY, 0.1, Rgb::WHITE).unwrap();
        assert!(w.translate(id, Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(r.live_pose(id).map(|p| p.p), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(r.live_pose(EntityId(0)), None);
        assert_eq!(r.live_pose(EntityId(9)), None);
        assert_eq!(r.read_versioned().0, 0);
    }

    #[test]
    fn live_pose_survives_bare_entities() {
        let mut w = World::new();
        let r = w.reader();
        for _ in 0..10 { w.create_entity(); }
        let mut last = EntityId(0);
        for i in 0..WORLD_SNAPSHOT_CAPACITY {
            last = w.add_sphere(Pose::from_position(Vec3::new(i as f64, 0.0, 0.0)), 0.1, Rgb::WHITE).unwrap();
        }
        assert_eq!(last, EntityId(WORLD_SNAPSHOT_CAPACITY as u32 + 10));
        assert_eq!(r.live_pose(last).map(|p| p.p.x), Some((WORLD_SNAPSHOT_CAPACITY - 1) as f64));
        assert_eq!(r.live_pose(EntityId(11)).map(|p| p.p.x), Some(0.0));
        // bare entities have no surface, so no live pose
        assert_eq!(r.live_pose(EntityId(5)), None);

        w.set_poses(&[(last, Pose::from_position(Vec3::Y))]);
        assert_eq!(r.live_pose(last).map(|p| p.p), Some(Vec3::Y));
    }
}
