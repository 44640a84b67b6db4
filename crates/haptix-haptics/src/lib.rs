pub mod params;
pub mod coupling;
pub mod feed;
pub mod engine;

pub use params::{HapticParams, ParamError};
pub use coupling::{coupling_force, clamp_force};
pub use feed::{ToolFeed, HapticView};
pub use engine::{HapticEngine, Contact, TickReport};
