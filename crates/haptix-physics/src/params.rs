use haptix_core::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    pub mobility: f64,      // toy: [m/(N*s)]
    pub max_step: f64,      // toy: per-command displacement clamp [m]
    pub fixed_dt: f64,      // rigid-body sub-step [s]
    pub max_substeps: u32,  // per advance; excess time is dropped
    pub gravity: Vec3,
    pub outer_dt: f64,      // physics thread period [s]
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            mobility: 1e-2,
            max_step: 0.05,
            fixed_dt: 1.0 / 240.0,
            max_substeps: 8,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            outer_dt: 0.004,
        }
    }
}
