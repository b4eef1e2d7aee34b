//! Tunable thresholds and fallbacks shared by the gravity core.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Distance below which a query point is considered to sit on a source center.
pub const COINCIDENCE_EPSILON: f64 = 1e-6;

/// Minimum `|up × forward|` for a forward hint to produce a usable basis.
pub const PARALLEL_EPSILON: f64 = 1e-5;

/// Numeric thresholds and fallback vectors for the gravity core.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravitySettings {
    /// Query positions closer than this to a source center are degenerate.
    pub coincidence_epsilon: f64,
    /// Forward hints whose cross product with up is shorter than this are
    /// treated as parallel to up.
    pub parallel_epsilon: f64,
    /// Gravity direction assumed before a body has ever been inside a field.
    pub fallback_direction: DVec3,
    /// Force reported for bodies in free space.
    pub ambient_force: DVec3,
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            coincidence_epsilon: COINCIDENCE_EPSILON,
            parallel_epsilon: PARALLEL_EPSILON,
            fallback_direction: DVec3::NEG_Z,
            ambient_force: DVec3::ZERO,
        }
    }
}

impl GravitySettings {
    /// Use a different world-down for bodies that have no cached direction.
    #[must_use]
    pub fn with_fallback_direction(mut self, direction: DVec3) -> Self {
        self.fallback_direction = direction.try_normalize().unwrap_or(DVec3::NEG_Z);
        self
    }
}
