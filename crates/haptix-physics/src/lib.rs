pub mod params;
pub mod props;
pub mod class;
pub mod backend;
pub mod toy;
#[cfg(feature = "rapier")]
pub mod rapier;
pub mod engine;

pub use params::PhysicsParams;
pub use props::PropsTable;
pub use class::BodyClass;
pub use backend::{Backend, StepStats};
pub use toy::ToyIntegrator;
#[cfg(feature = "rapier")]
pub use rapier::RapierBackend;
pub use engine::{PhysicsEngine, StepReport};
