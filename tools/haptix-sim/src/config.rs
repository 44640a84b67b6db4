use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use haptix_haptics::HapticParams;
use haptix_physics::PhysicsParams;
use haptix_viz::DebugSettings;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind { Toy, Rapier }

/// Scripted device path: a horizontal circle that bobs through y = 0.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trajectory {
    pub radius: f64,
    pub height: f64,
    pub dip: f64,
    pub period: f64,
}

impl Default for Trajectory {
    fn default() -> Self { Self { radius: 0.2, height: 0.01, dip: 0.04, period: 2.0 } }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub backend: BackendKind,
    pub duration: f64,
    pub haptics: HapticParams,
    pub physics: PhysicsParams,
    pub trajectory: Trajectory,
    pub debug: DebugSettings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Rapier,
            duration: 2.0,
            haptics: HapticParams::default(),
            physics: PhysicsParams::default(),
            trajectory: Trajectory::default(),
            debug: DebugSettings::default(),
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.haptics.validate()?;
        Ok(cfg)
    }

    /// HAPTIX_* environment overrides.
    pub fn apply_env(&mut self) {
        self.debug.print_every = env_u32("HAPTIX_PRINT_EVERY", self.debug.print_every);
        self.debug.json_every = env_u32("HAPTIX_JSON_EVERY", self.debug.json_every);
        self.duration = env_f64("HAPTIX_DURATION", self.duration);
        self.haptics.stiffness = env_f64("HAPTIX_STIFFNESS", self.haptics.stiffness);
        self.haptics.max_force = env_f64("HAPTIX_MAX_FORCE", self.haptics.max_force);
        self.physics.max_substeps = env_u32("HAPTIX_MAX_SUBSTEPS", self.physics.max_substeps);
    }
}

// ---------- tiny env helpers ----------
fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}
fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let c = SimConfig::from_json(r#"{ "backend": "toy", "haptics": { "max_force": 9.0 } }"#).unwrap();
        assert_eq!(c.backend, BackendKind::Toy);
        assert_eq!(c.haptics.max_force, 9.0);
        assert_eq!(c.haptics.stiffness, 2000.0);
        assert_eq!(c.physics, PhysicsParams::default());
    }

    #[test]
    fn example_config_parses() {
        let c = SimConfig::from_json(include_str!("../sim.example.json")).unwrap();
        assert_eq!(c.physics.max_substeps, 6);
        assert_eq!(c.debug.print_every, 250);
    }

    #[test]
    fn zero_haptic_dt_is_an_error() {
        let err = SimConfig::from_json(r#"{ "haptics": { "dt": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("`dt`"));
    }

    #[test]
    fn unknown_backend_is_an_error() {
        assert!(SimConfig::from_json(r#"{ "backend": "physx" }"#).is_err());
    }
}
