pub mod edit;
pub mod error;
pub mod reader;
pub mod world;

pub use edit::{WorldEdit, WorldEditor};
pub use error::WorldError;
pub use reader::WorldReader;
pub use world::{World, find_surface_index, LIVE_POSE_SLOTS};
