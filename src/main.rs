mod content;
mod core;
mod effects;
mod movement;
mod track;

use avian3d::prelude::*;
use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Airtime Rails".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins((
            content::ContentPlugin,
            track::TrackPlugin,
            movement::MovementPlugin,
            effects::EffectsPlugin,
            core::CorePlugin,
        ))
        .run();
}
