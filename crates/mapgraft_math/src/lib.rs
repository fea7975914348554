// Re-export glam for convenience
pub use glam::*;

// Mapgraft math types
mod aabb;
mod interval;
pub mod euler;
pub mod units;

pub use aabb::Aabb;
pub use euler::{quat_to_euler, EulerAngles};
pub use interval::Interval;
pub use units::rescale_linear;
