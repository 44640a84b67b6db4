use approx::assert_relative_eq;
use haptix_core::{Mat4, Quat, Vec3};
use haptix_env::{Environment, PlaneEnv, SphereEnv};
use proptest::prelude::*;

#[test]
fn sphere_at_origin_reference_values() {
    let s = SphereEnv::new(Vec3::ZERO, 0.5).unwrap();
    let x = Vec3::new(0.0, 0.0, 2.0);
    assert_relative_eq!(s.phi(x), 1.5);
    assert_eq!(s.grad(x), Vec3::new(0.0, 0.0, 1.0));
    let p = s.project(x);
    assert_relative_eq!(p.z, 0.5, epsilon = 1e-15);
    assert_eq!((p.x, p.y), (0.0, 0.0));

    let q = s.query(x);
    assert!(!q.inside);
    assert_eq!(q.proj, p);
}

fn coord() -> impl Strategy<Value = f64> { -10.0f64..10.0 }
fn point() -> impl Strategy<Value = Vec3> { (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z)) }

proptest! {
    #[test]
    fn sphere_projection_lands_on_surface(c in point(), r in 0.01f64..5.0, x in point()) {
        let s = SphereEnv::new(c, r).unwrap();
        prop_assume!((x - c).length() > 1e-6);
        prop_assert!(s.phi(s.project(x)).abs() < 1e-9);
    }

    #[test]
    fn plane_projection_lands_on_surface(
        n in point(), b in coord(), x in point(),
        angle in -3.0f64..3.0, t in point(),
    ) {
        prop_assume!(n.length() > 1e-3);
        let mut p = PlaneEnv::new(n, b).unwrap();
        p.update(&Mat4::from_rotation_translation(Quat::from_rotation_x(angle), t));
        prop_assert!(p.phi(p.project(x)).abs() < 1e-9);
    }
}
