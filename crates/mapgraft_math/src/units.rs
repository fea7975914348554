// Linear unit conversion between the source engine and the target scene.
//
// Source documents are authored in meters; the target scene graph works in
// inches. Only positions go through here: scale is a ratio and decal corner
// points stay in source units until a ray query has resolved them.

use glam::Vec3;

/// Meters to target units.
pub const SOURCE_TO_TARGET_UNITS: f32 = 39.37;

/// Rescale a source-space position into target units.
#[inline]
pub fn rescale_linear(v: Vec3) -> Vec3 {
    v * SOURCE_TO_TARGET_UNITS
}
