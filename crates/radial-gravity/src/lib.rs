//! Planet-relative ("radial") gravity for characters walking on spherical bodies.
//!
//! Gravity pulls toward the center of the governing gravity source instead of
//! along a fixed world axis, and the body frame is re-oriented every tick so
//! that "up" follows the local surface normal.
//!
//! # Design principles
//!
//! - **Engine-agnostic**: positions in, force and rotation out. The host owns
//!   integration, collision response and the transform.
//! - **Never fatal**: degenerate input degrades to the last safe state and is
//!   reported alongside the fallback value.
//! - **Deterministic**: overlapping sources are resolved by distance, then by
//!   registration order.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use radial_gravity::{AffectedBody, GravityIntegrator, GravitySource, SourceId, SourceRegistry};
//!
//! let mut registry = SourceRegistry::new();
//! registry
//!     .register(GravitySource::new(SourceId(1), DVec3::ZERO, 5000.0, -980.0))
//!     .unwrap();
//!
//! let integrator = GravityIntegrator::default();
//! let mut body = AffectedBody::new(DVec3::new(1000.0, 0.0, 0.0));
//! let candidates = registry.query_influencing(body.position);
//! let result = integrator.compute_gravity(&mut body, candidates);
//!
//! assert!(result.fault.is_none());
//! assert!((result.value.direction - DVec3::NEG_X).length() < 1e-9);
//! ```

pub mod adapter;
mod error;
pub mod field;
pub mod integrator;
pub mod orientation;
pub mod registry;
pub mod settings;
pub mod source;

pub use adapter::{GravityAffected, MovementAdapter, TickReport};
pub use error::{GravityError, Outcome, Result};
pub use field::FieldSample;
pub use integrator::{AffectedBody, BodyId, GravityIntegrator, GravityResult};
pub use orientation::{Orientation, OrientationSolver};
pub use registry::SourceRegistry;
pub use settings::GravitySettings;
pub use source::{Falloff, GravitySource, SourceId};
