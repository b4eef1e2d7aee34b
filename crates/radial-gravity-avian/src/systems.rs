//! Fixed-step systems keeping the registry current and applying gravity.

use std::collections::HashSet;

use avian3d::prelude::*;
use bevy::prelude::*;
use radial_gravity::{BodyId, GravityIntegrator, SourceId};

use crate::components::{GravityBody, GravityEmitter, GravityRegistry, RadialGravitySettings};
use crate::movement::AvianMovement;

/// Mirror emitter entities into the [`GravityRegistry`].
///
/// Runs at the start of the fixed step so the registry never changes while
/// bodies are being ticked. Removals are found by diffing the live emitters
/// against the ids this system registered, so they are not lost when several
/// frames pass without a fixed step. Sources registered directly on the
/// resource are left alone.
#[allow(clippy::type_complexity)]
pub fn sync_gravity_sources(
    mut registry: ResMut<GravityRegistry>,
    mut owned: Local<HashSet<SourceId>>,
    live: Query<Entity, With<GravityEmitter>>,
    added: Query<(Entity, &GravityEmitter, &Position), Added<GravityEmitter>>,
    changed: Query<
        (Entity, &GravityEmitter, &Position),
        Or<(Changed<GravityEmitter>, Changed<Position>)>,
    >,
) {
    let live: HashSet<SourceId> = live.iter().map(GravityEmitter::source_id).collect();
    owned.retain(|id| {
        if live.contains(id) {
            return true;
        }
        registry.unregister(*id);
        false
    });

    for (entity, emitter, position) in &added {
        let source = emitter.source(entity, position.0.as_dvec3());
        // Re-inserted on an entity we already track; `changed` refreshes it.
        if owned.contains(&source.id) {
            continue;
        }
        match registry.register(source) {
            Ok(()) => {
                owned.insert(source.id);
            }
            Err(e) => tracing::warn!("Failed to register gravity emitter {entity}: {e}"),
        }
    }

    for (entity, emitter, position) in &changed {
        let source = emitter.source(entity, position.0.as_dvec3());
        if owned.contains(&source.id) {
            registry.update(source);
        }
    }
}

/// Apply radial gravity to every [`GravityBody`].
///
/// Runs after the physics step; the velocity change takes effect on the next
/// step, matching how Avian integrates its own gravity.
#[allow(clippy::type_complexity)]
pub fn apply_radial_gravity(
    time: Res<Time<Fixed>>,
    registry: Res<GravityRegistry>,
    settings: Res<RadialGravitySettings>,
    mut bodies: Query<(
        Entity,
        &mut GravityBody,
        &Position,
        &mut LinearVelocity,
        &mut Rotation,
    )>,
) {
    let dt = time.delta_secs();
    let integrator = GravityIntegrator::new(settings.core);

    for (entity, mut body, position, mut velocity, mut rotation) in &mut bodies {
        body.state.id = BodyId(entity.to_bits());
        let forward = rotation.0 * Vec3::NEG_Z;
        body.state.sync(
            position.0.as_dvec3(),
            velocity.0.as_dvec3(),
            forward.as_dvec3(),
        );

        let mut movement = AvianMovement {
            velocity: &mut *velocity,
            rotation: &mut *rotation,
            dt,
            turn_rate: settings.turn_rate,
        };
        let report = integrator.tick(&registry.0, &mut *body, &mut movement);
        body.last_report = Some(report);
    }
}
