//! Feeding gravity output into Avian's velocity and rotation.

use avian3d::prelude::*;
use bevy::prelude::*;
use glam::{DMat3, DQuat, DVec3};
use radial_gravity::MovementAdapter;

/// Convert a core rotation into Bevy's convention.
///
/// The core maps local (X, Y, Z) to (forward, right, up). Bevy wants local +Y
/// to be up and local -Z to be forward, with local +X to the right.
#[must_use]
pub fn to_y_up(rotation: DQuat) -> Quat {
    let bevy_to_core = DQuat::from_mat3(&DMat3::from_cols(DVec3::NEG_Y, DVec3::Z, DVec3::NEG_X));
    (rotation * bevy_to_core).normalize().as_quat()
}

/// [`MovementAdapter`] writing into one Avian body.
///
/// The applied force is treated as an acceleration (`v += force * dt`), as
/// gravity is independent of mass.
pub struct AvianMovement<'a> {
    /// The body's velocity, integrated by the physics step.
    pub velocity: &'a mut LinearVelocity,
    /// The body's rotation.
    pub rotation: &'a mut Rotation,
    /// Fixed timestep in seconds.
    pub dt: f32,
    /// Maximum turn speed in radians per second. `None` snaps.
    pub turn_rate: Option<f32>,
}

impl MovementAdapter for AvianMovement<'_> {
    fn apply(&mut self, applied_force: DVec3, target_rotation: DQuat) {
        self.velocity.0 += applied_force.as_vec3() * self.dt;

        let target = to_y_up(target_rotation);
        self.rotation.0 = match self.turn_rate {
            Some(rate) => turn_towards(self.rotation.0, target, rate * self.dt),
            None => target,
        };
    }
}

/// Rotate `current` toward `target` by at most `max_angle` radians.
fn turn_towards(current: Quat, target: Quat, max_angle: f32) -> Quat {
    let angle = current.angle_between(target);
    if angle <= max_angle || angle <= f32::EPSILON {
        return target;
    }
    current.slerp(target, max_angle / angle).normalize()
}
