use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("ring full (capacity {capacity})")]
    Full { capacity: usize },
}
