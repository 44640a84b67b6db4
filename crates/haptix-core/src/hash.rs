use blake3::Hasher;

use crate::{Pose, SurfaceDef, SurfaceKind, WorldSnapshot};

/// Little-endian field feed into blake3.
struct SnapshotDigest(Hasher);

impl SnapshotDigest {
    fn f64s(&mut self, xs: &[f64]) {
        for x in xs { self.0.update(&x.to_le_bytes()); }
    }

    fn pose(&mut self, p: &Pose) {
        self.f64s(&[p.p.x, p.p.y, p.p.z, p.q.x, p.q.y, p.q.z, p.q.w]);
    }

    fn surface(&mut self, s: &SurfaceDef) {
        self.0.update(&s.id.0.to_le_bytes());
        match s.kind {
            SurfaceKind::Plane => { self.0.update(&[0]); }
            SurfaceKind::Sphere { radius } => { self.0.update(&[1]); self.f64s(&[radius]); }
            SurfaceKind::TriMesh { mesh } => { self.0.update(&[2]); self.0.update(&mesh.0.to_le_bytes()); }
        }
        self.pose(&s.pose);
        for c in [s.colour.r, s.colour.g, s.colour.b] { self.0.update(&c.to_le_bytes()); }
        self.0.update(&[s.role.map_or(0, |r| r as u8 + 1)]);
    }
}

impl WorldSnapshot {
    /// Content hash over `surfaces[..count]` (timestamp excluded).
    pub fn digest(&self) -> [u8; 32] {
        let mut d = SnapshotDigest(Hasher::new());
        d.0.update(&self.count.to_le_bytes());
        for s in self.surfaces() { d.surface(s); }
        *d.0.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityId, Role};

    #[test]
    fn digest_ignores_timestamp_but_not_pose() {
        let mut a = WorldSnapshot::default();
        a.push(SurfaceDef { id: EntityId(1), ..SurfaceDef::EMPTY });
        let mut b = a;
        b.timestamp = 42.0;
        assert_eq!(a.digest(), b.digest());
        b.surfaces[0].pose.p.y = 0.25;
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn digest_sees_role_and_kind() {
        let mut a = WorldSnapshot::default();
        a.push(SurfaceDef { id: EntityId(1), ..SurfaceDef::EMPTY });
        let mut roled = a;
        roled.surfaces[0].role = Some(Role::Tool);
        assert_ne!(a.digest(), roled.digest());
        let mut ball = a;
        ball.surfaces[0].kind = SurfaceKind::Sphere { radius: 0.0 };
        assert_ne!(a.digest(), ball.digest());
    }
}
