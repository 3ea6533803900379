//! Movement domain: base walk/run/strafe locomotion and the ground jump.
//!
//! This is the "host" half of movement. It only uses the speeds the controller
//! last wrote into `LocomotionMotor`, so zeroed speeds hand the body over to the
//! controller entirely.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::{GroundContact, LocomotionMotor, MovementInput, MovementTuning, Player};

/// Yaw speed in radians per second at full turn input.
const TURN_RATE: f32 = 2.5;

pub(crate) fn apply_locomotion(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<
        (
            &mut Transform,
            &LocomotionMotor,
            &GroundContact,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (mut transform, motor, ground, mut velocity) in &mut query {
        if input.turn != 0.0 {
            transform.rotate_y(input.turn * TURN_RATE * dt);
        }

        let speeds = motor.speeds;
        if speeds.is_zero() {
            continue;
        }

        // Forward uses run speed, backpedalling walks
        let forward_speed = if input.axis.y >= 0.0 {
            speeds.run
        } else {
            speeds.walk
        };
        let local = Vec3::new(
            input.axis.x * speeds.strafe,
            0.0,
            -input.axis.y * forward_speed,
        );
        let target = transform.rotation * local;

        if ground.grounded {
            velocity.x = target.x;
            velocity.z = target.z;

            if input.jump_pressed && speeds.jump_impulse > 0.0 {
                velocity.y = speeds.jump_impulse;
                debug!("Ground jump: impulse={}", speeds.jump_impulse);
            }
        } else if local != Vec3::ZERO {
            // Air steering never stops the player on its own
            let current = Vec3::new(velocity.x, 0.0, velocity.z);
            let steered =
                current + (target - current).clamp_length_max(tuning.air_control * dt);
            velocity.x = steered.x;
            velocity.z = steered.z;
        }
    }
}
