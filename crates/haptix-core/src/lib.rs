pub mod ids;
pub mod types;
pub mod surface;
pub mod snapshot;
pub mod command;
pub mod props;
pub mod hash;
pub mod time;

pub use ids::{EntityId, MeshId};
pub use types::{Vec3, Quat, Mat4, Pose, Rgb};
pub use surface::{SurfaceKind, SurfaceDef, Role};
pub use snapshot::{WorldSnapshot, ToolIn, ToolOut, HapticSnapshot, WORLD_SNAPSHOT_CAPACITY};
pub use command::{PhysicsCommand, PhysicsCommandList, MAX_COMMANDS_PER_TICK};
pub use props::PhysicsProps;
pub use time::{SimClock, Pacer};
