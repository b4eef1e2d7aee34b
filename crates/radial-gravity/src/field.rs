//! Per-source field evaluation.

use glam::DVec3;

use crate::error::{GravityError, Result};
use crate::settings::COINCIDENCE_EPSILON;
use crate::source::GravitySource;

/// Direction and strength of a source's field at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// Unit vector from the query point toward the source center.
    pub direction: DVec3,
    /// Signed strength after falloff.
    pub strength: f64,
    /// Distance from the query point to the source center.
    pub distance: f64,
}

/// Evaluate `source` at `position` with the default coincidence epsilon.
///
/// Callers are expected to have checked [`GravitySource::influences`] first;
/// the field is not defined outside the sphere of influence.
pub fn evaluate(source: &GravitySource, position: DVec3) -> Result<FieldSample> {
    evaluate_with_epsilon(source, position, COINCIDENCE_EPSILON)
}

/// Evaluate `source` at `position`.
///
/// Fails with [`GravityError::DegenerateGeometry`] when `position` is within
/// `epsilon` of the source center, where no direction exists.
pub fn evaluate_with_epsilon(
    source: &GravitySource,
    position: DVec3,
    epsilon: f64,
) -> Result<FieldSample> {
    let offset = source.position - position;
    let distance = offset.length();
    if distance <= epsilon || !distance.is_finite() {
        return Err(GravityError::DegenerateGeometry { position });
    }

    Ok(FieldSample {
        direction: offset / distance,
        strength: source.strength * source.falloff.attenuation(distance),
        distance,
    })
}
