use haptix_core::{Mat4, SurfaceDef, SurfaceKind, Vec3};

use crate::{Environment, EnvError, PlaneEnv, SphereEnv};

/// Closed set of contact-capable surfaces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Primitive {
    Plane(PlaneEnv),
    Sphere(SphereEnv),
}

impl Primitive {
    /// World-space primitive for `s`. `Ok(None)` for kinds with no SDF (TriMesh).
    pub fn from_surface(s: &SurfaceDef) -> Result<Option<Primitive>, EnvError> {
        let mut prim = match s.kind {
            SurfaceKind::Plane => Primitive::Plane(PlaneEnv::new(Vec3::Y, 0.0)?),
            SurfaceKind::Sphere { radius } => Primitive::Sphere(SphereEnv::new(Vec3::ZERO, radius)?),
            SurfaceKind::TriMesh { .. } => return Ok(None),
        };
        prim.update(&s.pose.world_from_local());
        Ok(Some(prim))
    }
}

impl Environment for Primitive {
    fn phi(&self, x: Vec3) -> f64 {
        match self { Primitive::Plane(p) => p.phi(x), Primitive::Sphere(s) => s.phi(x) }
    }
    fn grad(&self, x: Vec3) -> Vec3 {
        match self { Primitive::Plane(p) => p.grad(x), Primitive::Sphere(s) => s.grad(x) }
    }
    fn project(&self, x: Vec3) -> Vec3 {
        match self { Primitive::Plane(p) => p.project(x), Primitive::Sphere(s) => s.project(x) }
    }
    fn update(&mut self, m: &Mat4) {
        match self { Primitive::Plane(p) => p.update(m), Primitive::Sphere(s) => s.update(m) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use haptix_core::{EntityId, MeshId, Pose};

    fn surf(kind: SurfaceKind, pose: Pose) -> SurfaceDef {
        SurfaceDef { id: EntityId(1), kind, pose, ..SurfaceDef::EMPTY }
    }

    #[test]
    fn builds_in_world_frame() {
        let p = Primitive::from_surface(&surf(SurfaceKind::Sphere { radius: 0.25 },
            Pose::from_position(Vec3::new(1.0, 0.0, 0.0)))).unwrap().unwrap();
        assert_relative_eq!(p.phi(Vec3::new(1.0, 1.0, 0.0)), 0.75, epsilon = 1e-12);

        let g = Primitive::from_surface(&surf(SurfaceKind::Plane,
            Pose::from_position(Vec3::new(0.0, -1.0, 0.0)))).unwrap().unwrap();
        assert_relative_eq!(g.phi(Vec3::ZERO), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn trimesh_has_no_sdf_and_bad_radius_errors() {
        assert_eq!(Primitive::from_surface(&surf(SurfaceKind::TriMesh { mesh: MeshId(4) }, Pose::IDENTITY)), Ok(None));
        assert_eq!(Primitive::from_surface(&surf(SurfaceKind::Sphere { radius: -1.0 }, Pose::IDENTITY)),
                   Err(EnvError::InvalidRadius(-1.0)));
    }
}
