//! Gravity source records.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Opaque identity of a gravity source.
///
/// Hosts pick whatever stable handle they have for the emitting body, such as
/// an entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a source's strength changes with distance inside its sphere of influence.
///
/// The field always cuts off hard at the influence radius; falloff only shapes
/// the strength inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Falloff {
    /// Full strength everywhere inside the sphere of influence.
    #[default]
    Constant,
    /// Strength scales with `reference_radius / distance`.
    Linear {
        /// Distance at and below which full strength applies.
        reference_radius: f64,
    },
    /// Strength scales with `(reference_radius / distance)^2`.
    InverseSquare {
        /// Distance at and below which full strength applies.
        reference_radius: f64,
    },
}

impl Falloff {
    /// Attenuation factor in `[0, 1]` at `distance` from the source center.
    #[must_use]
    pub fn attenuation(&self, distance: f64) -> f64 {
        match *self {
            Falloff::Constant => 1.0,
            Falloff::Linear { reference_radius } => ratio(reference_radius, distance),
            Falloff::InverseSquare { reference_radius } => {
                let r = ratio(reference_radius, distance);
                r * r
            }
        }
    }
}

/// `reference / distance`, clamped so it never amplifies.
fn ratio(reference: f64, distance: f64) -> f64 {
    if reference <= 0.0 {
        return 1.0;
    }
    reference / distance.max(reference)
}

/// A body that emits a spherical gravity field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravitySource {
    /// Identity used for registration and removal.
    pub id: SourceId,
    /// Center of the field in world space.
    pub position: DVec3,
    /// Radius of the sphere of influence.
    pub radius: f64,
    /// Signed acceleration magnitude. The sign encodes attract or repel.
    pub strength: f64,
    /// Distance attenuation inside the sphere of influence.
    #[serde(default)]
    pub falloff: Falloff,
    /// Inactive sources never influence anything.
    pub active: bool,
}

impl GravitySource {
    /// Create an active constant-strength source.
    #[must_use]
    pub fn new(id: SourceId, position: DVec3, radius: f64, strength: f64) -> Self {
        Self {
            id,
            position,
            radius,
            strength,
            falloff: Falloff::Constant,
            active: true,
        }
    }

    /// Replace the distance attenuation model.
    #[must_use]
    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Mark the source as inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether `position` lies inside the sphere of influence.
    ///
    /// The boundary is inclusive: a point at exactly `radius` is influenced.
    /// A negative or NaN radius influences nothing.
    #[must_use]
    pub fn influences(&self, position: DVec3) -> bool {
        self.active
            && self.radius >= 0.0
            && self.position.distance_squared(position) <= self.radius * self.radius
    }
}
