//! Error types for gravity computations.

use std::fmt;

use glam::DVec3;

use crate::source::SourceId;

/// Result type for operations that reject their input outright.
pub type Result<T> = std::result::Result<T, GravityError>;

/// Errors that can occur while computing gravity or orientation.
///
/// None of these are fatal. Every per-tick operation substitutes a fallback
/// value and reports the error through [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GravityError {
    /// A source with this identity is already registered.
    DuplicateSource {
        /// The identity that was registered twice.
        id: SourceId,
    },
    /// The query position coincides with a source center.
    DegenerateGeometry {
        /// The offending query position.
        position: DVec3,
    },
    /// The baseline strength used to derive a gravity scale was zero.
    InvalidBaseline {
        /// The rejected baseline strength.
        baseline: f64,
    },
    /// The forward hint was parallel to up, so no basis could be built from it.
    DegenerateOrientationBasis {
        /// The requested up vector.
        up: DVec3,
        /// The rejected forward hint.
        forward_hint: DVec3,
    },
}

impl fmt::Display for GravityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSource { id } => {
                write!(f, "gravity source {id} is already registered")
            }
            Self::DegenerateGeometry { position } => {
                write!(f, "query position {position} coincides with a source center")
            }
            Self::InvalidBaseline { baseline } => {
                write!(f, "baseline gravity strength {baseline} cannot be used as a divisor")
            }
            Self::DegenerateOrientationBasis { up, forward_hint } => {
                write!(f, "forward hint {forward_hint} is parallel to up {up}")
            }
        }
    }
}

impl std::error::Error for GravityError {}

/// A computed value that may have been produced by a fallback path.
///
/// When `fault` is set, `value` is the substitute the operation degraded to,
/// and the fault describes why.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome<T> {
    /// The computed or fallback value.
    pub value: T,
    /// The error that forced a fallback, if any.
    pub fault: Option<GravityError>,
}

impl<T> Outcome<T> {
    /// A value computed without any fallback.
    #[must_use]
    pub fn ok(value: T) -> Self {
        Self { value, fault: None }
    }

    /// A fallback value together with the error that required it.
    #[must_use]
    pub fn degraded(value: T, fault: GravityError) -> Self {
        Self {
            value,
            fault: Some(fault),
        }
    }

    /// Whether the value was computed without a fallback.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.fault.is_none()
    }

    /// Drop the fault and keep the value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}
