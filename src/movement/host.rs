//! Movement domain: the locomotion primitives the controller drives.
//!
//! The controller never touches the ECS directly. Everything it reads or writes
//! about the player body goes through `LocomotionHost`, which the physics adapter
//! implements for live players and tests implement with a scripted double.

use avian3d::prelude::LayerMask;
use bevy::prelude::*;

/// Gravity scale used while on a rail. Zero would let the body fall asleep.
pub const ZERO_GRAVITY: f32 = 0.0001;

/// Speeds handed to the base walk/run/jump locomotion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionSpeeds {
    pub walk: f32,
    pub run: f32,
    pub strafe: f32,
    pub jump_impulse: f32,
}

impl LocomotionSpeeds {
    /// Locomotion switched off, used while the walker owns the player.
    pub const ZERO: Self = Self {
        walk: 0.0,
        run: 0.0,
        strafe: 0.0,
        jump_impulse: 0.0,
    };

    /// Scales the planar speeds, leaving the jump impulse alone.
    pub fn scaled(self, multiplier: f32) -> Self {
        Self {
            walk: self.walk * multiplier,
            run: self.run * multiplier,
            strafe: self.strafe * multiplier,
            jump_impulse: self.jump_impulse,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// A capsule sweep looking for a wall.
#[derive(Debug, Clone, Copy)]
pub struct WallProbe {
    pub direction: Dir3,
    pub radius: f32,
    pub distance: f32,
    pub layers: LayerMask,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub point: Vec3,
    /// Surface normal pointing back towards the player
    pub normal: Vec3,
    pub distance: f32,
}

pub trait LocomotionHost {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    /// Moves the body instantly, bypassing collision.
    fn teleport(&mut self, position: Vec3, rotation: Quat);
    fn is_grounded(&self) -> bool;
    fn set_speeds(&mut self, speeds: LocomotionSpeeds);
    fn set_gravity_scale(&mut self, scale: f32);
    fn cast_wall(&self, probe: &WallProbe) -> Option<WallHit>;
    /// Turns the collision sensors of a rail on or off.
    fn set_rail_enabled(&mut self, rail: Entity, enabled: bool);
}
