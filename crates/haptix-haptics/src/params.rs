use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("haptic parameter `{name}` must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("haptic parameter `{name}` must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticParams {
    pub stiffness: f64,       // K [N/m]
    pub damping_ratio: f64,   // zeta
    pub effective_mass: f64,  // m_eff [kg], placeholder
    pub max_force: f64,       // [N]
    pub dt: f64,              // tick period [s]
    pub surface_eps: f64,     // contact when phi < -surface_eps
    pub reference_passthrough: bool, // reference := device; false uses the submitted reference
}

impl Default for HapticParams {
    fn default() -> Self {
        Self {
            stiffness: 2000.0,
            damping_ratio: 0.7,
            effective_mass: 0.2,
            max_force: 15.0,
            dt: 0.001,
            surface_eps: 0.0,
            reference_passthrough: true,
        }
    }
}

impl HapticParams {
    /// D = zeta * 2 * sqrt(K * m_eff)
    #[inline] pub fn damping(&self) -> f64 {
        self.damping_ratio * 2.0 * (self.stiffness * self.effective_mass).max(0.0).sqrt()
    }

    /// Rejects values that would make the coupling force non-finite.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("stiffness", self.stiffness),
            ("effective_mass", self.effective_mass),
            ("max_force", self.max_force),
            ("dt", self.dt),
        ] {
            if !(value.is_finite() && value > 0.0) { return Err(ParamError::NotPositive { name, value }); }
        }
        for (name, value) in [("damping_ratio", self.damping_ratio), ("surface_eps", self.surface_eps)] {
            if !(value.is_finite() && value >= 0.0) { return Err(ParamError::Negative { name, value }); }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_damping_is_28() {
        assert_relative_eq!(HapticParams::default().damping(), 28.0, epsilon = 1e-12);
    }

    #[test]
    fn defaults_validate() {
        assert_eq!(HapticParams::default().validate(), Ok(()));
    }

    #[test]
    fn zero_dt_is_rejected() {
        let p = HapticParams { dt: 0.0, ..HapticParams::default() };
        assert_eq!(p.validate(), Err(ParamError::NotPositive { name: "dt", value: 0.0 }));
    }

    #[test]
    fn non_finite_and_negative_values_are_rejected() {
        let nan_k = HapticParams { stiffness: f64::NAN, ..HapticParams::default() };
        assert!(matches!(nan_k.validate(), Err(ParamError::NotPositive { name: "stiffness", .. })));
        let neg_f = HapticParams { max_force: -1.0, ..HapticParams::default() };
        assert!(matches!(neg_f.validate(), Err(ParamError::NotPositive { name: "max_force", .. })));
        let inf_m = HapticParams { effective_mass: f64::INFINITY, ..HapticParams::default() };
        assert!(inf_m.validate().is_err());
        let neg_zeta = HapticParams { damping_ratio: -0.1, ..HapticParams::default() };
        assert!(matches!(neg_zeta.validate(), Err(ParamError::Negative { name: "damping_ratio", .. })));
    }
}
