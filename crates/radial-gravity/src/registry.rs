//! The live set of gravity-emitting bodies.
//!
//! The registry is shared read-only by every body during a tick. Mutations are
//! expected only at frame boundaries (spawn and despawn callbacks).

use glam::DVec3;

use crate::error::{GravityError, Result};
use crate::source::{GravitySource, SourceId};

/// Registered gravity sources, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<GravitySource>,
}

impl SourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source at the end of the registration order.
    ///
    /// Rejects the source, leaving the registry untouched, if its identity is
    /// already present.
    pub fn register(&mut self, source: GravitySource) -> Result<()> {
        if self.get(source.id).is_some() {
            tracing::warn!(id = %source.id, "rejected duplicate gravity source");
            return Err(GravityError::DuplicateSource { id: source.id });
        }

        tracing::debug!(
            id = %source.id,
            radius = source.radius,
            strength = source.strength,
            "registered gravity source"
        );
        self.sources.push(source);
        Ok(())
    }

    /// Remove a source, returning it if it was present.
    ///
    /// Removing an unknown identity is not an error: the emitting body may
    /// already have been torn down.
    pub fn unregister(&mut self, id: SourceId) -> Option<GravitySource> {
        let index = self.sources.iter().position(|s| s.id == id)?;
        tracing::debug!(%id, "unregistered gravity source");
        Some(self.sources.remove(index))
    }

    /// All active sources whose sphere of influence contains `position`.
    ///
    /// The iterator is lazy, finite and yields sources in registration order.
    /// Clone it to walk the candidates again.
    pub fn query_influencing(
        &self,
        position: DVec3,
    ) -> impl Iterator<Item = &GravitySource> + Clone + '_ {
        self.sources
            .iter()
            .filter(move |source| source.influences(position))
    }

    /// Look up a source by identity.
    #[must_use]
    pub fn get(&self, id: SourceId) -> Option<&GravitySource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Move a source's center. Returns `false` if the source is unknown.
    pub fn move_source(&mut self, id: SourceId, position: DVec3) -> bool {
        match self.sources.iter_mut().find(|s| s.id == id) {
            Some(source) => {
                source.position = position;
                true
            }
            None => false,
        }
    }

    /// Enable or disable a source. Returns `false` if the source is unknown.
    pub fn set_active(&mut self, id: SourceId, active: bool) -> bool {
        match self.sources.iter_mut().find(|s| s.id == id) {
            Some(source) => {
                if source.active != active {
                    tracing::debug!(%id, active, "toggled gravity source");
                }
                source.active = active;
                true
            }
            None => false,
        }
    }

    /// Replace the stored record for an already-registered source.
    ///
    /// Registration order is preserved. Returns `false` if the source is unknown.
    pub fn update(&mut self, source: GravitySource) -> bool {
        match self.sources.iter_mut().find(|s| s.id == source.id) {
            Some(existing) => {
                *existing = source;
                true
            }
            None => false,
        }
    }

    /// Every registered source, active or not, in registration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &GravitySource> + ExactSizeIterator {
        self.sources.iter()
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no sources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Remove every source.
    pub fn clear(&mut self) {
        self.sources.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn planet(id: u64, x: f64) -> GravitySource {
        GravitySource::new(SourceId(id), DVec3::new(x, 0.0, 0.0), 5000.0, -980.0)
    }

    fn ids<'a>(sources: impl Iterator<Item = &'a GravitySource>) -> Vec<u64> {
        sources.map(|s| s.id.0).collect()
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = SourceRegistry::new();
        registry.register(planet(1, 0.0)).unwrap();

        let err = registry.register(planet(1, 100.0)).unwrap_err();
        assert_eq!(err, GravityError::DuplicateSource { id: SourceId(1) });

        // Prior state is kept.
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(SourceId(1)).unwrap().position, DVec3::ZERO);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let mut registry = SourceRegistry::new();
        registry.register(planet(1, 0.0)).unwrap();

        assert!(registry.unregister(SourceId(2)).is_none());
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(SourceId(1)).is_some());
        assert!(registry.is_empty());
        assert!(registry.unregister(SourceId(1)).is_none());
    }

    #[test]
    fn test_query_in_registration_order() {
        let mut registry = SourceRegistry::new();
        registry.register(planet(3, 10_000.0)).unwrap();
        registry.register(planet(1, 0.0)).unwrap();
        registry.register(planet(2, 50_000.0)).unwrap();

        let query = registry.query_influencing(DVec3::new(5000.0, 0.0, 0.0));
        assert_eq!(ids(query.clone()), vec![3, 1]);
        // Restartable.
        assert_eq!(ids(query), vec![3, 1]);
    }

    #[test]
    fn test_query_empty_in_free_space() {
        let mut registry = SourceRegistry::new();
        registry.register(planet(1, 0.0)).unwrap();
        assert_eq!(
            registry
                .query_influencing(DVec3::new(6000.0, 0.0, 0.0))
                .count(),
            0
        );
    }

    #[test]
    fn test_reregister_moves_to_back() {
        let mut registry = SourceRegistry::new();
        registry.register(planet(1, 0.0)).unwrap();
        registry.register(planet(2, 0.0)).unwrap();
        registry.unregister(SourceId(1));
        registry.register(planet(1, 0.0)).unwrap();

        assert_eq!(ids(registry.query_influencing(DVec3::ZERO)), vec![2, 1]);
    }

    #[test]
    fn test_inactive_sources_are_skipped() {
        let mut registry = SourceRegistry::new();
        registry.register(planet(1, 0.0)).unwrap();
        registry.register(planet(2, 0.0)).unwrap();

        assert!(registry.set_active(SourceId(1), false));
        assert_eq!(ids(registry.query_influencing(DVec3::ZERO)), vec![2]);

        assert!(registry.set_active(SourceId(1), true));
        assert_eq!(ids(registry.query_influencing(DVec3::ZERO)), vec![1, 2]);

        assert!(!registry.set_active(SourceId(9), true));
    }

    #[test]
    fn test_move_and_update() {
        let mut registry = SourceRegistry::new();
        registry.register(planet(1, 0.0)).unwrap();
        registry.register(planet(2, 0.0)).unwrap();

        assert!(registry.move_source(SourceId(1), DVec3::new(20_000.0, 0.0, 0.0)));
        assert_eq!(ids(registry.query_influencing(DVec3::ZERO)), vec![2]);
        assert!(!registry.move_source(SourceId(5), DVec3::ZERO));

        let mut bigger = planet(1, 20_000.0);
        bigger.radius = 25_000.0;
        assert!(registry.update(bigger));
        assert_eq!(ids(registry.query_influencing(DVec3::ZERO)), vec![1, 2]);
        assert!(!registry.update(planet(9, 0.0)));

        registry.clear();
        assert!(registry.is_empty());
    }

    proptest! {
        #[test]
        fn test_outside_never_returned(
            dir in (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0),
            extra in 1e-3f64..1e6,
        ) {
            let dir = DVec3::new(dir.0, dir.1, dir.2);
            prop_assume!(dir.length() > 1e-3);
            let mut registry = SourceRegistry::new();
            registry.register(planet(1, 0.0)).unwrap();

            let position = dir.normalize() * (5000.0 + extra);
            prop_assert_eq!(registry.query_influencing(position).count(), 0);
        }

        #[test]
        fn test_inside_always_returned(
            dir in (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0),
            distance in 0.0f64..4999.0,
        ) {
            let dir = DVec3::new(dir.0, dir.1, dir.2);
            prop_assume!(dir.length() > 1e-3);
            let mut registry = SourceRegistry::new();
            registry.register(planet(1, 0.0)).unwrap();

            let position = dir.normalize() * distance;
            prop_assert_eq!(ids(registry.query_influencing(position)), vec![1]);
        }
    }
}
