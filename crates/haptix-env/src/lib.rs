pub mod sdf;
pub mod plane;
pub mod sphere;
pub mod primitive;
pub mod error;

pub use sdf::{Environment, Query, newton_project, GRAD_EPS2};
pub use plane::PlaneEnv;
pub use sphere::SphereEnv;
pub use primitive::Primitive;
pub use error::EnvError;
