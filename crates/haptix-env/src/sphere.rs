use haptix_core::{Mat4, Vec3};

use crate::{Environment, EnvError};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereEnv {
    c_local: Vec3,
    r_local: f64,
    c: Vec3,
    r: f64,
}

impl SphereEnv {
    pub fn new(center: Vec3, radius: f64) -> Result<Self, EnvError> {
        if !(radius.is_finite() && radius > 0.0) { return Err(EnvError::InvalidRadius(radius)); }
        Ok(Self { c_local: center, r_local: radius, c: center, r: radius })
    }

    #[inline] pub fn center(&self) -> Vec3 { self.c }
    #[inline] pub fn radius(&self) -> f64 { self.r }
}

impl Environment for SphereEnv {
    #[inline] fn phi(&self, x: Vec3) -> f64 { (x - self.c).length() - self.r }

    /// Zero at the exact centre.
    fn grad(&self, x: Vec3) -> Vec3 {
        let d = x - self.c;
        let len = d.length();
        if len <= 0.0 { Vec3::ZERO } else { d / len }
    }

    // Uniform scale taken from the first basis column.
    fn update(&mut self, m: &Mat4) {
        self.c = m.transform_point3(self.c_local);
        let s = m.x_axis.truncate().length();
        if s.is_finite() && s > 0.0 { self.r = self.r_local * s; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_bad_radius() {
        assert_eq!(SphereEnv::new(Vec3::ZERO, 0.0), Err(EnvError::InvalidRadius(0.0)));
        assert!(SphereEnv::new(Vec3::ZERO, -1.0).is_err());
        assert!(SphereEnv::new(Vec3::ZERO, f64::INFINITY).is_err());
    }

    #[test]
    fn centre_projection_is_identity() {
        let s = SphereEnv::new(Vec3::new(1.0, 1.0, 1.0), 0.3).unwrap();
        assert_eq!(s.grad(s.center()), Vec3::ZERO);
        assert_eq!(s.project(s.center()), s.center());
        assert_eq!(s.normal(s.center()), None);
    }

    #[test]
    fn update_translates_and_scales() {
        let mut s = SphereEnv::new(Vec3::ZERO, 0.5).unwrap();
        s.update(&Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0), haptix_core::Quat::IDENTITY, Vec3::new(0.0, 1.0, 0.0)));
        assert_relative_eq!(s.radius(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.phi(Vec3::new(0.0, 3.0, 0.0)), 1.0, epsilon = 1e-12);
    }
}
