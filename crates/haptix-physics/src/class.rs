use haptix_core::{PhysicsProps, SurfaceKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BodyClass {
    Static,
    Dynamic,
    Kinematic,
    Unsupported,
}

impl BodyClass {
    /// Planes are always static; TriMesh has no physics yet.
    pub fn of(kind: &SurfaceKind, props: &PhysicsProps) -> BodyClass {
        match kind {
            SurfaceKind::Plane => BodyClass::Static,
            SurfaceKind::Sphere { .. } if !props.dynamic => BodyClass::Static,
            SurfaceKind::Sphere { .. } if props.kinematic => BodyClass::Kinematic,
            SurfaceKind::Sphere { .. } => BodyClass::Dynamic,
            SurfaceKind::TriMesh { .. } => BodyClass::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haptix_core::MeshId;

    #[test]
    fn classification() {
        let d = PhysicsProps::default();
        let s = SurfaceKind::Sphere { radius: 0.1 };
        assert_eq!(BodyClass::of(&SurfaceKind::Plane, &d), BodyClass::Static);
        assert_eq!(BodyClass::of(&s, &d), BodyClass::Dynamic);
        assert_eq!(BodyClass::of(&s, &PhysicsProps { kinematic: true, ..d }), BodyClass::Kinematic);
        assert_eq!(BodyClass::of(&s, &PhysicsProps { kinematic: true, ..PhysicsProps::fixed() }), BodyClass::Static);
        assert_eq!(BodyClass::of(&SurfaceKind::TriMesh { mesh: MeshId(1) }, &d), BodyClass::Unsupported);
    }
}
