//! Drives the radial gravity systems through a headless Bevy app.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::prelude::*;
use glam::DVec3;
use radial_gravity_avian::radial_gravity::{BodyId, GravitySource, SourceId};
use radial_gravity_avian::{
    GravityBody, GravityEmitter, GravityRegistry, RadialGravityPlugin, RadialGravitySettings,
};

const DT: f32 = 1.0 / 64.0;

fn create_test_app() -> App {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut app = App::new();
    app.add_plugins(RadialGravityPlugin);
    app.init_resource::<Time<Fixed>>();
    app
}

/// Run one fixed step's worth of radial gravity schedules.
fn step(app: &mut App) {
    let world = app.world_mut();
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(DT));
    world.run_schedule(FixedPreUpdate);
    world.run_schedule(FixedPostUpdate);
}

fn spawn_planet(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Position(position), GravityEmitter::new(5000.0, -980.0)))
        .id()
}

fn spawn_body(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Position(position),
            LinearVelocity(Vec3::ZERO),
            Rotation::default(),
            GravityBody::new(),
        ))
        .id()
}

#[test]
fn test_plugin_disables_uniform_gravity() {
    let app = create_test_app();
    assert_eq!(app.world().resource::<Gravity>().0, Vec3::ZERO);
    assert!(app.world().contains_resource::<RadialGravitySettings>());
}

#[test]
fn test_emitters_are_registered_and_removed() {
    let mut app = create_test_app();
    let planet = spawn_planet(&mut app, Vec3::ZERO);
    step(&mut app);

    {
        let registry = app.world().resource::<GravityRegistry>();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(SourceId(planet.to_bits())).is_some());
    }

    app.world_mut().despawn(planet);
    step(&mut app);
    assert!(app.world().resource::<GravityRegistry>().is_empty());
}

#[test]
fn test_despawn_between_fixed_steps_is_not_lost() {
    let mut app = create_test_app();
    let planet = spawn_planet(&mut app, Vec3::ZERO);
    step(&mut app);
    app.world_mut().clear_trackers();

    // Several render frames pass with no fixed step, so the removal event
    // ages out of the double-buffered queue before the sync system sees it.
    app.world_mut().despawn(planet);
    app.world_mut().clear_trackers();
    app.world_mut().clear_trackers();
    step(&mut app);

    assert!(app.world().resource::<GravityRegistry>().is_empty());
}

#[test]
fn test_sync_keeps_sources_registered_directly() {
    let mut app = create_test_app();
    let manual = GravitySource::new(SourceId(u64::MAX), DVec3::ZERO, 100.0, -1.0);
    app.world_mut()
        .resource_mut::<GravityRegistry>()
        .register(manual)
        .unwrap();
    let planet = spawn_planet(&mut app, Vec3::ZERO);
    step(&mut app);

    app.world_mut().despawn(planet);
    step(&mut app);

    let registry = app.world().resource::<GravityRegistry>();
    assert_eq!(registry.len(), 1);
    assert!(registry.get(SourceId(u64::MAX)).is_some());
}

#[test]
fn test_body_state_is_tagged_with_entity() {
    let mut app = create_test_app();
    let body = spawn_body(&mut app, Vec3::new(1000.0, 0.0, 0.0));
    let other = spawn_body(&mut app, Vec3::new(0.0, 1000.0, 0.0));
    step(&mut app);

    let world = app.world();
    let id = world.get::<GravityBody>(body).unwrap().state.id;
    let other_id = world.get::<GravityBody>(other).unwrap().state.id;
    assert_eq!(id, BodyId(body.to_bits()));
    assert_eq!(other_id, BodyId(other.to_bits()));
}

#[test]
fn test_moved_emitter_is_updated() {
    let mut app = create_test_app();
    let planet = spawn_planet(&mut app, Vec3::ZERO);
    step(&mut app);

    app.world_mut().get_mut::<Position>(planet).unwrap().0 = Vec3::new(100.0, 0.0, 0.0);
    step(&mut app);

    let registry = app.world().resource::<GravityRegistry>();
    let source = registry.get(GravityEmitter::source_id(planet)).unwrap();
    assert_eq!(source.position, DVec3::new(100.0, 0.0, 0.0));
}

#[test]
fn test_body_is_pulled_and_oriented() {
    let mut app = create_test_app();
    spawn_planet(&mut app, Vec3::ZERO);
    let body = spawn_body(&mut app, Vec3::new(1000.0, 0.0, 0.0));
    step(&mut app);

    let world = app.world();
    let velocity = world.get::<LinearVelocity>(body).unwrap().0;
    // Direction is -X and strength is -980: the applied force is +X.
    assert!((velocity - Vec3::new(980.0 * DT, 0.0, 0.0)).length() < 1e-3);

    let rotation = world.get::<Rotation>(body).unwrap().0;
    assert!((rotation * Vec3::Y - Vec3::X).length() < 1e-4);

    let gravity_body = world.get::<GravityBody>(body).unwrap();
    let report = gravity_body.last_report.unwrap();
    assert!(report.is_clean());
    assert_eq!(gravity_body.gravity_direction(), Some(report.gravity.value.direction));
}

#[test]
fn test_body_outside_range_is_untouched() {
    let mut app = create_test_app();
    spawn_planet(&mut app, Vec3::ZERO);
    let body = spawn_body(&mut app, Vec3::new(6000.0, 0.0, 0.0));
    step(&mut app);

    let world = app.world();
    assert_eq!(world.get::<LinearVelocity>(body).unwrap().0, Vec3::ZERO);
    let report = world.get::<GravityBody>(body).unwrap().last_report.unwrap();
    assert_eq!(report.gravity.value.source, None);
}

#[test]
fn test_equidistant_planets_use_first_spawned() {
    let mut app = create_test_app();
    let first = spawn_planet(&mut app, Vec3::ZERO);
    spawn_planet(&mut app, Vec3::new(10_000.0, 0.0, 0.0));
    let body = spawn_body(&mut app, Vec3::new(5000.0, 0.0, 0.0));
    step(&mut app);

    let report = app
        .world()
        .get::<GravityBody>(body)
        .unwrap()
        .last_report
        .unwrap();
    assert_eq!(
        report.gravity.value.source,
        Some(GravityEmitter::source_id(first))
    );
}

#[test]
fn test_turn_rate_limits_reorientation() {
    let mut app = create_test_app();
    app.world_mut()
        .resource_mut::<RadialGravitySettings>()
        .turn_rate = Some(1.0);
    spawn_planet(&mut app, Vec3::ZERO);
    let body = spawn_body(&mut app, Vec3::new(1000.0, 0.0, 0.0));
    step(&mut app);

    let rotation = app.world().get::<Rotation>(body).unwrap().0;
    let turned = rotation.angle_between(Quat::IDENTITY);
    assert!((turned - DT).abs() < 1e-3, "turned {turned}");
}
