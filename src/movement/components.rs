//! Movement domain: components and physics layers for locomotion.

use avian3d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::host::LocomotionSpeeds;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Surfaces that can be ridden and jumped from
    Wall,
    /// Player character
    Player,
    /// Rail sample sensors - never block movement
    Rail,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

/// Result of the last downward ground probe.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct GroundContact {
    pub grounded: bool,
    pub normal: Vec3,
}

/// Base locomotion the controller currently allows. Written by the controller,
/// consumed by `apply_locomotion`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LocomotionMotor {
    pub speeds: LocomotionSpeeds,
}

/// Listens for rail sample sensors touching the player.
#[derive(Component, Debug, Clone, Copy)]
pub struct RailDetector {
    pub rail_layer: GameLayer,
}

impl Default for RailDetector {
    fn default() -> Self {
        Self {
            rail_layer: GameLayer::Rail,
        }
    }
}

/// Sample sensors currently overlapping the player, oldest first.
#[derive(Component, Debug, Default, Clone)]
pub struct RailContacts {
    pub touching: Vec<Entity>,
}

impl RailContacts {
    pub fn insert(&mut self, sample: Entity) {
        if !self.touching.contains(&sample) {
            self.touching.push(sample);
        }
    }

    pub fn remove(&mut self, sample: Entity) {
        self.touching.retain(|&entity| entity != sample);
    }
}
