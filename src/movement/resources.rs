//! Movement domain: tuning and input resources.

use avian3d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::GameLayer;
use crate::movement::host::LocomotionSpeeds;

/// Every movement tunable. Loaded from `movement.ron`; missing fields keep these defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    // Base locomotion
    pub walk_speed: f32,
    /// Speed at full stick deflection
    pub run_speed: f32,
    pub strafe_speed: f32,
    pub jump_impulse: f32,
    pub gravity_strength: f32,
    /// How fast airborne input can change horizontal velocity
    pub air_control: f32,
    /// Time without ground contact before Grounded gives up
    pub ground_debounce_time: f32,

    // Acceleration
    pub acceleration_enabled: bool,
    pub acceleration_rate: f32,
    pub acceleration_loss_rate: f32,
    /// Fraction of full speed available as soon as the player moves
    pub acceleration_minimum: f32,

    // Jumps
    pub bonus_jump_time: f32,
    pub ledge_jump_time: f32,
    pub double_jump_enabled: bool,
    pub double_jump_impulse: f32,
    pub ground_resets_double_jump: bool,
    pub wall_resets_double_jump: bool,
    pub grinding_resets_double_jump: bool,

    // Walls
    pub wall_detection_size: f32,
    pub wall_detection_distance: f32,
    pub wall_layers: Vec<GameLayer>,
    pub wall_ride_enabled: bool,
    pub wall_ride_deadzone: f32,
    pub wall_ride_acquire_angle: f32,
    /// Looser angle that keeps an existing wallride going
    pub wall_ride_maintain_angle: f32,
    pub wall_ride_friction: f32,
    pub wall_ride_fall_speed: f32,
    pub wall_ride_slope_tolerance: f32,
    pub wall_jump_enabled: bool,
    pub wall_jump_force: f32,
    pub wall_jump_impulse: f32,
    pub wall_jump_time: f32,
    pub wall_jump_cooldown: f32,

    // Grinding
    pub grinding_enabled: bool,
    pub grind_acceleration: f32,
    pub grind_max_speed: f32,
    pub grind_brake_speed: f32,
    pub grind_jump_impulse: f32,
    /// Above this horizontal speed the entry direction follows momentum, below it facing
    pub grind_momentum_threshold: f32,
    pub grind_jump_cooldown: f32,
    pub grind_fall_cooldown: f32,
    pub grind_slow_deadzone: f32,
    pub grind_turn_deadzone: f32,
    pub grind_turn_cooldown: f32,
    pub grind_turn_angle: f32,
    /// Follow gaps beyond this are treated as stuck and teleported
    pub grind_teleport_distance: f32,
    pub grinding_disables_rail: bool,
    /// Only falling players can land on a rail
    pub grinding_must_fall: bool,
    pub track_snap_epsilon: f32,
    pub track_snap_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 4.0,
            strafe_speed: 2.0,
            jump_impulse: 3.0,
            gravity_strength: 1.0,
            air_control: 12.0,
            ground_debounce_time: 0.02,

            acceleration_enabled: false,
            acceleration_rate: 2.0,
            acceleration_loss_rate: 10.0,
            acceleration_minimum: 0.2,

            bonus_jump_time: 0.0,
            ledge_jump_time: 0.1,
            double_jump_enabled: false,
            double_jump_impulse: 3.0,
            ground_resets_double_jump: true,
            wall_resets_double_jump: true,
            grinding_resets_double_jump: true,

            wall_detection_size: 0.15,
            wall_detection_distance: 0.5,
            wall_layers: vec![GameLayer::Wall],
            wall_ride_enabled: false,
            wall_ride_deadzone: 0.4,
            wall_ride_acquire_angle: 70.0,
            wall_ride_maintain_angle: 110.0,
            wall_ride_friction: 10.0,
            wall_ride_fall_speed: 1.0,
            wall_ride_slope_tolerance: 0.15,
            wall_jump_enabled: false,
            wall_jump_force: 4.0,
            wall_jump_impulse: 3.0,
            wall_jump_time: 0.2,
            wall_jump_cooldown: 0.6,

            grinding_enabled: false,
            grind_acceleration: 10.0,
            grind_max_speed: 5.0,
            grind_brake_speed: 2.5,
            grind_jump_impulse: 4.0,
            grind_momentum_threshold: 1.0,
            grind_jump_cooldown: 0.8,
            grind_fall_cooldown: 0.2,
            grind_slow_deadzone: 0.1,
            grind_turn_deadzone: 0.9,
            grind_turn_cooldown: 0.2,
            grind_turn_angle: 120.0,
            grind_teleport_distance: 10.0,
            grinding_disables_rail: true,
            grinding_must_fall: true,
            track_snap_epsilon: 0.04,
            track_snap_speed: 35.0,
        }
    }
}

impl MovementTuning {
    pub fn base_speeds(&self) -> LocomotionSpeeds {
        LocomotionSpeeds {
            walk: self.walk_speed,
            run: self.run_speed,
            strafe: self.strafe_speed,
            jump_impulse: self.jump_impulse,
        }
    }

    pub fn wall_mask(&self) -> LayerMask {
        LayerMask(
            self.wall_layers
                .iter()
                .fold(0, |bits, layer| bits | layer.to_bits()),
        )
    }

    /// True when anything needs the wall probe at all.
    pub fn uses_walls(&self) -> bool {
        self.wall_ride_enabled || self.wall_jump_enabled
    }
}

/// Input sampled once per frame.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct MovementInput {
    /// x strafes right, y moves forward
    pub axis: Vec2,
    pub jump_pressed: bool,
    pub jump_held: bool,
    /// Whether any key is bound to jump. Rails cannot be grabbed without one.
    pub jump_bound: bool,
    /// Yaw input, positive turns left
    pub turn: f32,
}

impl MovementInput {
    /// Local-space move direction (Bevy forward is -Z), clamped to unit length.
    pub fn direction_3d(&self) -> Vec3 {
        Vec3::new(self.axis.x, 0.0, -self.axis.y).clamp_length_max(1.0)
    }
}

/// Keys mapped to jump.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct JumpBinding {
    pub keys: Vec<KeyCode>,
}

impl Default for JumpBinding {
    fn default() -> Self {
        Self {
            keys: vec![KeyCode::Space],
        }
    }
}

impl JumpBinding {
    pub fn is_bound(&self) -> bool {
        !self.keys.is_empty()
    }
}
