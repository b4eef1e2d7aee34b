//! Surface-aligned orientation.
//!
//! Builds a rigid frame whose up axis points away from the governing source
//! while keeping as much of the requested facing as possible. The body-local
//! axes are X = forward, Y = right, Z = up.

use glam::{DMat3, DQuat, DVec3};

use crate::error::{GravityError, Outcome};
use crate::settings::PARALLEL_EPSILON;

/// An orthonormal body frame and the rotation that produces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Facing direction, tangent to the surface.
    pub forward: DVec3,
    /// `up × forward`, tangent to the surface.
    pub right: DVec3,
    /// Away from the governing source.
    pub up: DVec3,
    /// Rotation taking local (X, Y, Z) to (forward, right, up).
    pub rotation: DQuat,
}

impl Orientation {
    /// The world-aligned frame.
    pub const IDENTITY: Self = Self {
        forward: DVec3::X,
        right: DVec3::Y,
        up: DVec3::Z,
        rotation: DQuat::IDENTITY,
    };

    fn from_axes(forward: DVec3, right: DVec3, up: DVec3) -> Self {
        let rotation = DQuat::from_mat3(&DMat3::from_cols(forward, right, up)).normalize();
        Self {
            forward,
            right,
            up,
            rotation,
        }
    }

    /// The three axes as matrix columns (forward, right, up).
    #[must_use]
    pub fn basis(&self) -> DMat3 {
        DMat3::from_cols(self.forward, self.right, self.up)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Derives body orientation from an up vector and a facing hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationSolver {
    /// Minimum `|up × forward_hint|` (with a unit hint) for the hint to be used.
    pub parallel_epsilon: f64,
}

impl Default for OrientationSolver {
    fn default() -> Self {
        Self {
            parallel_epsilon: PARALLEL_EPSILON,
        }
    }
}

impl OrientationSolver {
    /// Create a solver with a custom parallel threshold.
    #[must_use]
    pub fn new(parallel_epsilon: f64) -> Self {
        Self { parallel_epsilon }
    }

    /// Align up with `up`, keeping `forward_hint` as the facing where possible.
    ///
    /// A hint parallel to `up` cannot define a facing. The solver then picks an
    /// arbitrary tangent direction and reports
    /// [`GravityError::DegenerateOrientationBasis`].
    #[must_use]
    pub fn solve(&self, up: DVec3, forward_hint: DVec3) -> Outcome<Orientation> {
        self.solve_with_fallback(up, forward_hint, None)
    }

    /// Like [`solve`](Self::solve), but tries `fallback_hint` (typically the
    /// body's previous forward) before resorting to an arbitrary tangent.
    #[must_use]
    pub fn solve_with_fallback(
        &self,
        up: DVec3,
        forward_hint: DVec3,
        fallback_hint: Option<DVec3>,
    ) -> Outcome<Orientation> {
        let fault = GravityError::DegenerateOrientationBasis { up, forward_hint };

        let Some(unit_up) = up.try_normalize() else {
            tracing::warn!(%up, "cannot orient against a zero up vector");
            return Outcome::degraded(Orientation::IDENTITY, fault);
        };

        if let Some(orientation) = self.frame(unit_up, forward_hint) {
            return Outcome::ok(orientation);
        }

        tracing::warn!(
            %up,
            %forward_hint,
            "forward hint is parallel to up, substituting a fallback facing"
        );

        let orientation = fallback_hint
            .and_then(|hint| self.frame(unit_up, hint))
            .unwrap_or_else(|| {
                // Any orthonormal vector is perpendicular to up, so the cross
                // product is already unit length.
                let right = unit_up.cross(unit_up.any_orthonormal_vector());
                Orientation::from_axes(right.cross(unit_up), right, unit_up)
            });
        Outcome::degraded(orientation, fault)
    }

    fn frame(&self, up: DVec3, forward_hint: DVec3) -> Option<Orientation> {
        let hint = forward_hint.try_normalize()?;
        let right = up.cross(hint);
        if right.length() < self.parallel_epsilon {
            return None;
        }
        let right = right.normalize();
        let forward = right.cross(up);
        Some(Orientation::from_axes(forward, right, up))
    }
}
