//! Core domain: camera and lighting for the playground.

mod systems;

use bevy::prelude::*;

use crate::movement::MovementSet;

/// Where the follow camera sits relative to the player, in the player's frame.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraRig {
    pub offset: Vec3,
    /// Exponential follow rate per second
    pub smoothing: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 3.5, 7.0),
            smoothing: 6.0,
        }
    }
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .add_systems(Startup, (systems::setup_camera, systems::setup_light))
            .add_systems(Update, systems::follow_player.after(MovementSet));
    }
}
