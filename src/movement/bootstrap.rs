//! Movement domain: player bootstrap.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::{
    GameLayer, GroundContact, LocomotionMotor, MovementTuning, Player, PlayerController,
    RailContacts, RailDetector,
};

pub(crate) const PLAYER_RADIUS: f32 = 0.3;
pub(crate) const PLAYER_LENGTH: f32 = 1.2;

/// Spawns the player body. The controller starts airborne and lands on its own.
pub(crate) fn spawn_player(
    mut commands: Commands,
    tuning: Res<MovementTuning>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!(
        "Spawning player: run={}, jump={}, grinding={}, wallride={}",
        tuning.run_speed, tuning.jump_impulse, tuning.grinding_enabled, tuning.wall_ride_enabled
    );

    commands.spawn((
        // Identity & Movement
        (
            Name::new("Player"),
            Player,
            PlayerController::default(),
            GroundContact::default(),
            LocomotionMotor {
                speeds: tuning.base_speeds(),
            },
            RailDetector::default(),
            RailContacts::default(),
        ),
        // Rendering
        (
            Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_LENGTH))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.9, 0.9, 0.9),
                ..default()
            })),
        ),
        Transform::from_xyz(0.0, 2.0, 0.0),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::capsule(PLAYER_RADIUS, PLAYER_LENGTH),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(tuning.gravity_strength),
            Friction::new(0.0),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Ground, GameLayer::Wall, GameLayer::Rail],
            ),
        ),
    ));
}
