use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EnvError {
    #[error("sphere radius must be finite and > 0 (got {0})")]
    InvalidRadius(f64),
    #[error("plane normal must be finite and non-zero")]
    InvalidNormal,
}
