// Quaternion to intrinsic Euler angle conversion for the target scene.
//
// The pole branches carry fixed +/-90 degree offsets that line the result up
// with the target editor's axis convention. They are not derivable from a
// textbook decomposition and must be kept exactly as written.

use glam::Quat;
use serde::{Deserialize, Serialize};

/// Singularity test threshold. Inputs with `|z*x - w*y|` beyond this are at a pole.
pub const SINGULARITY_THRESHOLD: f32 = 0.4999995;

/// Pitch/yaw/roll in degrees, in the target scene's convention.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl EulerAngles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

impl std::fmt::Display for EulerAngles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.pitch, self.yaw, self.roll)
    }
}

/// Convert a rotation quaternion to Euler angles.
///
/// The quaternion is used as given. Non-unit input is not normalized, so
/// malformed source data converts exactly as the source engine would.
pub fn quat_to_euler(q: Quat) -> EulerAngles {
    let singularity = q.z * q.x - q.w * q.y;

    if singularity < -SINGULARITY_THRESHOLD {
        // South pole
        EulerAngles::new(
            90.0,
            q.w.atan2(q.x).to_degrees() - 90.0,
            q.y.atan2(q.z).to_degrees() - 90.0,
        )
    } else if singularity > SINGULARITY_THRESHOLD {
        // North pole
        EulerAngles::new(
            -90.0,
            -q.w.atan2(q.x).to_degrees() + 90.0,
            q.y.atan2(q.z).to_degrees() + 90.0,
        )
    } else {
        let a = 2.0 * q.w * q.w + 2.0 * q.x * q.x - 1.0;
        let b = 2.0 * q.x * q.y + 2.0 * q.w * q.z;
        let c = 2.0 * q.x * q.z - 2.0 * q.w * q.y;
        let d = 2.0 * q.y * q.z + 2.0 * q.w * q.x;
        let e = 2.0 * q.w * q.w + 2.0 * q.z * q.z - 1.0;

        EulerAngles::new(
            (-c).asin().to_degrees(),
            b.atan2(a).to_degrees(),
            d.atan2(e).to_degrees(),
        )
    }
}
