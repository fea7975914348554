use crate::{Interval, Vec3};

/// Axis-Aligned Bounding Box describing a model's local footprint.
///
/// Defined by three intervals (one per axis). Unlike a raytracing box this
/// one is never padded: a flat model has zero volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Enclosed volume in model units cubed.
    ///
    /// Computed in `f64` since large terrain pieces overflow `f32` precision
    /// once multiplied by instance scale.
    pub fn volume(&self) -> f64 {
        self.x.size() as f64 * self.y.size() as f64 * self.z.size() as f64
    }
}
