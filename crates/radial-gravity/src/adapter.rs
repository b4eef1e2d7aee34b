//! The boundary between the gravity core and a host movement simulation.
//!
//! Bodies opt in through [`GravityAffected`], and the host's physics layer
//! receives results through [`MovementAdapter`]. Neither trait cares about the
//! body's type hierarchy, so any body can be composed with gravity.

use glam::{DQuat, DVec3};

use crate::error::Outcome;
use crate::integrator::{AffectedBody, GravityIntegrator, GravityResult};
use crate::orientation::Orientation;
use crate::registry::SourceRegistry;

/// Capability of a body that experiences radial gravity.
pub trait GravityAffected {
    /// The body's gravity state.
    fn gravity_state(&self) -> &AffectedBody;

    /// Mutable access to the body's gravity state.
    fn gravity_state_mut(&mut self) -> &mut AffectedBody;

    /// Observe the outcome of a tick, for example to expose it for debugging.
    fn apply_gravity_result(&mut self, _gravity: &GravityResult, _orientation: &Orientation) {}
}

impl GravityAffected for AffectedBody {
    fn gravity_state(&self) -> &AffectedBody {
        self
    }

    fn gravity_state_mut(&mut self) -> &mut AffectedBody {
        self
    }
}

/// Receives gravity output and feeds it into the host's own integration.
///
/// The adapter decides how force becomes velocity (subject to collision,
/// friction and so on) and whether the rotation is applied at once or
/// smoothed. The core never moves a body itself.
pub trait MovementAdapter {
    /// Apply one tick's gravity force and target rotation.
    fn apply(&mut self, applied_force: DVec3, target_rotation: DQuat);
}

/// Everything a single [`GravityIntegrator::tick`] produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// The applied gravity and any fallback taken while computing it.
    pub gravity: Outcome<GravityResult>,
    /// The target orientation and any fallback taken while solving it.
    pub orientation: Outcome<Orientation>,
}

impl TickReport {
    /// Whether neither stage needed a fallback.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.gravity.is_ok() && self.orientation.is_ok()
    }
}

impl GravityIntegrator {
    /// Run one simulation tick for `body`.
    ///
    /// Queries `registry` for sources influencing the body, computes the
    /// applied force, solves the orientation with up opposite to gravity and
    /// hands both to `movement`. Faults are reported in the returned
    /// [`TickReport`]; the adapter always receives a usable value.
    pub fn tick<B, M>(
        &self,
        registry: &SourceRegistry,
        body: &mut B,
        movement: &mut M,
    ) -> TickReport
    where
        B: GravityAffected + ?Sized,
        M: MovementAdapter + ?Sized,
    {
        let state = body.gravity_state_mut();
        let candidates = registry.query_influencing(state.position);
        let gravity = self.compute_gravity(state, candidates);
        let orientation = self.orient(state, gravity.value.direction);

        movement.apply(gravity.value.applied_force, orientation.value.rotation);
        body.apply_gravity_result(&gravity.value, &orientation.value);

        TickReport {
            gravity,
            orientation,
        }
    }
}
