use haptix_core::Vec3;

use crate::HapticParams;

/// Spring-damper force on the tool: `-K (x_t - x_p) - D (v_t - v_p)`.
#[inline]
pub fn coupling_force(p: &HapticParams, tool: Vec3, tool_vel: Vec3, proxy: Vec3, proxy_vel: Vec3) -> Vec3 {
    -p.stiffness * (tool - proxy) - p.damping() * (tool_vel - proxy_vel)
}

/// Uniform rescale to `|f| <= max`.
#[inline]
pub fn clamp_force(f: Vec3, max: f64) -> Vec3 {
    let m2 = f.length_squared();
    if m2 > max * max && m2 > 0.0 { f * (max / m2.sqrt()) } else { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn spring_pulls_tool_toward_proxy() {
        let p = HapticParams::default();
        let f = coupling_force(&p, Vec3::new(0.0, -0.001, 0.0), Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        assert_relative_eq!(f.y, 2.0, epsilon = 1e-12);
        assert_eq!(clamp_force(f, p.max_force), f);
    }

    #[test]
    fn proxy_velocity_adds_damping() {
        let p = HapticParams::default();
        let f = coupling_force(&p, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0));
        assert_relative_eq!(f.x, 2.8, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn clamp_keeps_direction_and_caps_magnitude(
            x in -1e4f64..1e4, y in -1e4f64..1e4, z in -1e4f64..1e4,
        ) {
            let f = Vec3::new(x, y, z);
            prop_assume!(f.length() > 15.0);
            let c = clamp_force(f, 15.0);
            prop_assert!((c.length() - 15.0).abs() < 1e-6);
            prop_assert!((c.normalize().dot(f.normalize()) - 1.0).abs() < 1e-9);
        }
    }
}
