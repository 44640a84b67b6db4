use haptix_core::{Mat4, Vec3};

use crate::{Environment, EnvError};

/// Half-space boundary `n . x = b` with unit `n`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneEnv {
    n_local: Vec3,
    b_local: f64,
    n: Vec3,
    b: f64,
}

impl PlaneEnv {
    pub fn new(normal: Vec3, offset: f64) -> Result<Self, EnvError> {
        if !normal.is_finite() || !offset.is_finite() || normal.length_squared() < 1e-24 {
            return Err(EnvError::InvalidNormal);
        }
        let n = normal.normalize();
        Ok(Self { n_local: n, b_local: offset, n, b: offset })
    }

    #[inline] pub fn world_normal(&self) -> Vec3 { self.n }
    #[inline] pub fn world_offset(&self) -> f64 { self.b }
}

impl Environment for PlaneEnv {
    #[inline] fn phi(&self, x: Vec3) -> f64 { self.n.dot(x) - self.b }
    #[inline] fn grad(&self, _x: Vec3) -> Vec3 { self.n }

    // Rigid or uniformly scaled transforms only.
    fn update(&mut self, m: &Mat4) {
        let n = m.transform_vector3(self.n_local);
        if n.length_squared() < 1e-24 { return; }
        self.n = n.normalize();
        let p = m.transform_point3(self.n_local * self.b_local);
        self.b = self.n.dot(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use haptix_core::Quat;

    #[test]
    fn rejects_zero_normal() {
        assert_eq!(PlaneEnv::new(Vec3::ZERO, 0.0), Err(EnvError::InvalidNormal));
        assert!(PlaneEnv::new(Vec3::new(f64::NAN, 1.0, 0.0), 0.0).is_err());
    }

    #[test]
    fn update_moves_and_tilts() {
        let mut p = PlaneEnv::new(Vec3::Y, 0.0).unwrap();
        p.update(&Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
        assert_relative_eq!(p.phi(Vec3::new(5.0, 3.0, -1.0)), 1.0, epsilon = 1e-12);

        let q = Quat::from_rotation_z(std::f64::consts::FRAC_PI_2);
        p.update(&Mat4::from_rotation_translation(q, Vec3::ZERO));
        let n = p.world_normal();
        assert_relative_eq!(n.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(p.world_offset(), 0.0, epsilon = 1e-12);
    }
}
