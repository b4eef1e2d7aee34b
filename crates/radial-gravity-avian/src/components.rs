//! Components and resources for radial gravity.

use bevy::prelude::*;
use glam::DVec3;
use radial_gravity::{
    AffectedBody, Falloff, GravityAffected, GravitySettings, GravitySource, SourceId,
    SourceRegistry, TickReport,
};
use serde::{Deserialize, Serialize};

/// Registry of every live [`GravityEmitter`], keyed by entity.
///
/// Mutated only by [`sync_gravity_sources`](crate::sync_gravity_sources) at
/// the start of a fixed step.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct GravityRegistry(pub SourceRegistry);

/// Radial gravity tuning.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialGravitySettings {
    /// Thresholds and fallbacks for the gravity core.
    pub core: GravitySettings,
    /// Maximum turn speed toward the target orientation in radians per
    /// second. `None` snaps to the target every step.
    pub turn_rate: Option<f32>,
}

impl Default for RadialGravitySettings {
    fn default() -> Self {
        Self {
            // Bevy is Y-up.
            core: GravitySettings::default().with_fallback_direction(DVec3::NEG_Y),
            turn_rate: None,
        }
    }
}

/// Makes an entity a spherical gravity source centered on its `Position`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GravityEmitter {
    /// Radius of the sphere of influence.
    pub radius: f64,
    /// Signed acceleration; the sign encodes attract or repel.
    pub strength: f64,
    /// Distance attenuation inside the sphere of influence.
    pub falloff: Falloff,
    /// Inactive emitters stay registered but influence nothing.
    pub active: bool,
}

impl GravityEmitter {
    /// An active constant-strength emitter.
    #[must_use]
    pub fn new(radius: f64, strength: f64) -> Self {
        Self {
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

    /// Source identity for an emitter entity.
    #[must_use]
    pub fn source_id(entity: Entity) -> SourceId {
        SourceId(entity.to_bits())
    }

    /// The registry record for this emitter on `entity` at `position`.
    #[must_use]
    pub fn source(&self, entity: Entity, position: DVec3) -> GravitySource {
        GravitySource {
            id: Self::source_id(entity),
            position,
            radius: self.radius,
            strength: self.strength,
            falloff: self.falloff,
            active: self.active,
        }
    }
}

/// Makes an entity subject to radial gravity.
///
/// Requires Avian's `Position`, `LinearVelocity` and `Rotation`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GravityBody {
    /// Gravity state shared with the core.
    pub state: AffectedBody,
    /// Outcome of the most recent fixed step, for debugging and UI.
    pub last_report: Option<TickReport>,
}

impl Default for GravityBody {
    fn default() -> Self {
        Self {
            state: AffectedBody::new(DVec3::ZERO),
            last_report: None,
        }
    }
}

impl GravityBody {
    /// A body with unit gravity scale.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A body whose gravity scale is `|designer_strength / baseline_strength|`.
    ///
    /// A zero baseline leaves the body at unit scale.
    #[must_use]
    pub fn with_designer_strength(designer_strength: f64, baseline_strength: f64) -> Self {
        let mut body = Self::default();
        // The error is logged by the core; unit scale is the fallback.
        let _ = body
            .state
            .set_gravity_scale(designer_strength, baseline_strength);
        body
    }

    /// The current gravity direction, if the body has been inside a field.
    #[must_use]
    pub fn gravity_direction(&self) -> Option<DVec3> {
        self.state.gravity_direction
    }
}

impl GravityAffected for GravityBody {
    fn gravity_state(&self) -> &AffectedBody {
        &self.state
    }

    fn gravity_state_mut(&mut self) -> &mut AffectedBody {
        &mut self.state
    }
}
