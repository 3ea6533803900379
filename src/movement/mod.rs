//! Movement domain: the player movement state machine, rail detection and locomotion.

mod bootstrap;
mod components;
mod controller;
pub mod detector;
#[cfg(feature = "dev-tools")]
mod dev;
pub mod host;
mod resources;
mod state;
mod systems;

pub use components::{
    GameLayer, Ground, GroundContact, LocomotionMotor, Player, RailContacts, RailDetector, Wall,
};
pub use controller::{GrindRequest, PlayerController};
pub use resources::{JumpBinding, MovementInput, MovementTuning};
pub use state::{MovementEvents, MovementState, MovementTimers};

use bevy::prelude::*;

use crate::movement::bootstrap::spawn_player;
use crate::movement::systems::{
    apply_locomotion, detect_ground, detect_rail_contacts, read_input, tick_player_controllers,
    track_rail_contacts,
};

/// Runs the whole movement pipeline in order every frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovementSet;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .init_resource::<JumpBinding>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    read_input,
                    detect_ground,
                    apply_locomotion,
                    track_rail_contacts,
                    detect_rail_contacts,
                    tick_player_controllers,
                )
                    .chain()
                    .in_set(MovementSet),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, dev::spawn_playground)
            .add_systems(
                Update,
                (dev::log_state_changes, dev::draw_grind_frames).after(MovementSet),
            );
    }
}
