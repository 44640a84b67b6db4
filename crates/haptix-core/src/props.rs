use serde::{Deserialize, Serialize};

/// Per-entity physical properties. Missing entries fall back to `Default`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsProps {
    pub dynamic: bool,          // false => static
    pub kinematic: bool,        // dynamic + kinematic => moved by pose targets only
    pub density: f64,           // kg/m^3, used when `mass` is None
    pub mass: Option<f64>,      // kg, overrides density
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub static_friction: f64,
    pub dynamic_friction: f64,
    pub restitution: f64,
}

impl Default for PhysicsProps {
    fn default() -> Self {
        Self {
            dynamic: true,
            kinematic: false,
            density: 1000.0,
            mass: None,
            linear_damping: 0.05,
            angular_damping: 0.05,
            static_friction: 0.6,
            dynamic_friction: 0.6,
            restitution: 0.1,
        }
    }
}

impl PhysicsProps {
    pub fn fixed() -> Self { Self { dynamic: false, ..Self::default() } }

    /// Mass for a solid sphere: explicit mass wins, otherwise density * volume.
    pub fn sphere_mass(&self, radius: f64) -> f64 {
        self.mass.unwrap_or_else(|| {
            let vol = (4.0 / 3.0) * core::f64::consts::PI * radius * radius * radius;
            self.density * vol
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn explicit_mass_overrides_density() {
        let p = PhysicsProps { mass: Some(2.5), ..PhysicsProps::default() };
        assert_relative_eq!(p.sphere_mass(0.5), 2.5);
        let d = PhysicsProps::default();
        assert_relative_eq!(d.sphere_mass(0.1), 1000.0 * 4.0 / 3.0 * core::f64::consts::PI * 1e-3, epsilon = 1e-12);
    }
}
