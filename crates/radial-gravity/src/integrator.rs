//! Per-tick gravity selection and force computation.

use std::fmt;

use glam::DVec3;

use crate::error::{GravityError, Outcome, Result};
use crate::field;
use crate::orientation::{Orientation, OrientationSolver};
use crate::settings::GravitySettings;
use crate::source::{GravitySource, SourceId};

/// Identity of a body affected by gravity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Gravity state of one body, refreshed by the host and the integrator every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffectedBody {
    /// Identity, used for diagnostics only.
    pub id: BodyId,
    /// Current world position.
    pub position: DVec3,
    /// Current velocity.
    pub velocity: DVec3,
    /// Current facing, used as the orientation hint.
    pub forward: DVec3,
    /// Last good gravity direction, if the body has ever been inside a field.
    pub gravity_direction: Option<DVec3>,
    /// Dimensionless multiplier on experienced gravity.
    pub gravity_scale: f64,
    /// Last good orientation, used when a tick cannot produce one.
    pub orientation: Orientation,
}

impl AffectedBody {
    /// A body at rest at `position`, facing world +X with unit gravity scale.
    #[must_use]
    pub fn new(position: DVec3) -> Self {
        Self {
            id: BodyId::default(),
            position,
            velocity: DVec3::ZERO,
            forward: DVec3::X,
            gravity_direction: None,
            gravity_scale: 1.0,
            orientation: Orientation::IDENTITY,
        }
    }

    /// Set the diagnostic identity.
    #[must_use]
    pub fn with_id(mut self, id: BodyId) -> Self {
        self.id = id;
        self
    }

    /// Set the facing hint.
    #[must_use]
    pub fn with_forward(mut self, forward: DVec3) -> Self {
        self.forward = forward;
        self
    }

    /// Refresh the kinematic state the host owns.
    pub fn sync(&mut self, position: DVec3, velocity: DVec3, forward: DVec3) {
        self.position = position;
        self.velocity = velocity;
        self.forward = forward;
    }

    /// Bind an explicit gravity direction.
    ///
    /// The direction is normalized. A zero-length or non-finite direction is
    /// ignored and `false` is returned, keeping the previous direction.
    pub fn set_gravity_direction(&mut self, direction: DVec3) -> bool {
        match direction.try_normalize() {
            Some(direction) => {
                self.gravity_direction = Some(direction);
                true
            }
            None => false,
        }
    }

    /// Derive the gravity scale as `|designer_strength / baseline_strength|`.
    ///
    /// A zero (or non-finite) baseline is rejected and the current scale is
    /// left as it was.
    pub fn set_gravity_scale(
        &mut self,
        designer_strength: f64,
        baseline_strength: f64,
    ) -> Result<f64> {
        if baseline_strength == 0.0 || !baseline_strength.is_finite() {
            tracing::warn!(
                body = %self.id,
                designer_strength,
                baseline_strength,
                "invalid baseline gravity strength, keeping scale {}",
                self.gravity_scale
            );
            return Err(GravityError::InvalidBaseline {
                baseline: baseline_strength,
            });
        }

        self.gravity_scale = (designer_strength / baseline_strength).abs();
        Ok(self.gravity_scale)
    }
}

/// What gravity does to a body this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityResult {
    /// Unit gravity direction (toward the governing source).
    pub direction: DVec3,
    /// `direction * strength * gravity_scale`, for the movement simulation.
    pub applied_force: DVec3,
    /// The governing source, or `None` in free space.
    pub source: Option<SourceId>,
}

/// Turns candidate sources into a single applied force and an up vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GravityIntegrator {
    settings: GravitySettings,
    solver: OrientationSolver,
}

impl GravityIntegrator {
    /// Create an integrator with custom thresholds and fallbacks.
    #[must_use]
    pub fn new(settings: GravitySettings) -> Self {
        Self {
            settings,
            solver: OrientationSolver::new(settings.parallel_epsilon),
        }
    }

    /// The settings this integrator was built with.
    #[must_use]
    pub fn settings(&self) -> &GravitySettings {
        &self.settings
    }

    /// The orientation solver sharing these settings.
    #[must_use]
    pub fn solver(&self) -> &OrientationSolver {
        &self.solver
    }

    /// The body's cached direction, or the configured world-down.
    #[must_use]
    pub fn current_direction(&self, body: &AffectedBody) -> DVec3 {
        body.gravity_direction.unwrap_or(self.settings.fallback_direction)
    }

    /// Compute the gravity acting on `body` from the sources influencing it.
    ///
    /// The governing source is the nearest candidate; equal distances resolve to
    /// whichever candidate comes first, so pass candidates in registration
    /// order. With no candidates the body is in free space and receives the
    /// ambient force with its direction unchanged.
    ///
    /// On success the body's cached gravity direction is updated. If the body
    /// sits on the governing source's center, the cached direction is reused and
    /// the fault is reported.
    pub fn compute_gravity<'a>(
        &self,
        body: &mut AffectedBody,
        candidates: impl IntoIterator<Item = &'a GravitySource>,
    ) -> Outcome<GravityResult> {
        let position = body.position;
        let governing = candidates.into_iter().min_by(|a, b| {
            a.position
                .distance_squared(position)
                .total_cmp(&b.position.distance_squared(position))
        });

        let Some(source) = governing else {
            let result = GravityResult {
                direction: self.current_direction(body),
                applied_force: self.settings.ambient_force * body.gravity_scale,
                source: None,
            };
            tracing::trace!(body = %body.id, "body is in free space");
            return Outcome::ok(result);
        };

        match field::evaluate_with_epsilon(source, position, self.settings.coincidence_epsilon) {
            Ok(sample) => {
                body.gravity_direction = Some(sample.direction);
                let result = GravityResult {
                    direction: sample.direction,
                    applied_force: sample.direction * sample.strength * body.gravity_scale,
                    source: Some(source.id),
                };
                tracing::trace!(
                    body = %body.id,
                    source = %source.id,
                    force = %result.applied_force,
                    "computed gravity"
                );
                Outcome::ok(result)
            }
            Err(fault) => {
                let direction = self.current_direction(body);
                tracing::warn!(
                    body = %body.id,
                    source = %source.id,
                    %position,
                    "body is at a gravity source center, reusing direction {direction}"
                );
                let result = GravityResult {
                    direction,
                    applied_force: direction * source.strength * body.gravity_scale,
                    source: Some(source.id),
                };
                Outcome::degraded(result, fault)
            }
        }
    }

    /// Orient `body` so that up points away from `direction`.
    ///
    /// The body's forward is the facing hint; its previous orientation's
    /// forward is the fallback hint. The solved orientation is cached on the
    /// body.
    pub fn orient(&self, body: &mut AffectedBody, direction: DVec3) -> Outcome<Orientation> {
        let fallback = Some(body.orientation.forward);
        let solved = self
            .solver
            .solve_with_fallback(-direction, body.forward, fallback);
        body.orientation = solved.value;
        solved
    }
}
