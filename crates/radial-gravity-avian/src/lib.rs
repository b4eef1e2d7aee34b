//! Radial gravity for Avian 3D bodies.
//!
//! Replaces Avian's uniform [`Gravity`](avian3d::prelude::Gravity) with
//! planet-relative gravity from the `radial-gravity` core. Entities carrying a
//! [`GravityEmitter`] become gravity sources; entities carrying a
//! [`GravityBody`] are pulled toward the nearest source whose sphere of
//! influence contains them and are turned so their local up (+Y) points away
//! from it.
//!
//! Registry mutations happen in `FixedPreUpdate`, before any body is ticked.
//! Gravity is applied in `FixedPostUpdate` after the physics step, by adding
//! `force * dt` to [`LinearVelocity`](avian3d::prelude::LinearVelocity) and
//! writing [`Rotation`](avian3d::prelude::Rotation).

mod components;
mod movement;
mod systems;

use avian3d::prelude::*;
use bevy::prelude::*;

pub use components::{GravityBody, GravityEmitter, GravityRegistry, RadialGravitySettings};
pub use movement::{AvianMovement, to_y_up};
pub use radial_gravity;
pub use systems::{apply_radial_gravity, sync_gravity_sources};

/// Plugin wiring radial gravity into the fixed-step schedules.
///
/// Add Avian's `PhysicsPlugins` separately; this plugin only disables its
/// uniform gravity.
pub struct RadialGravityPlugin;

impl Plugin for RadialGravityPlugin {
    fn build(&self, app: &mut App) {
        // Disable default gravity - every body gets radial gravity instead.
        app.insert_resource(Gravity(Vec3::ZERO))
            .init_resource::<GravityRegistry>()
            .init_resource::<RadialGravitySettings>()
            .add_systems(FixedPreUpdate, sync_gravity_sources)
            .add_systems(
                FixedPostUpdate,
                apply_radial_gravity.after(PhysicsSystems::Last),
            );
    }
}
