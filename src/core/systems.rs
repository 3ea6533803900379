//! Core domain: camera and light setup, camera follow.

use bevy::prelude::*;

use super::CameraRig;
use crate::movement::Player;

pub(crate) fn setup_camera(mut commands: Commands, rig: Res<CameraRig>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(rig.offset).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub(crate) fn setup_light(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub(crate) fn follow_player(
    time: Res<Time>,
    rig: Res<CameraRig>,
    player: Query<&Transform, (With<Player>, Without<Camera3d>)>,
    mut camera: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok(target) = player.single() else {
        return;
    };
    let Ok(mut camera) = camera.single_mut() else {
        return;
    };

    let goal = target.translation + target.rotation * rig.offset;
    let blend = 1.0 - (-rig.smoothing * time.delta_secs()).exp();
    camera.translation = camera.translation.lerp(goal, blend);
    camera.look_at(target.translation + Vec3::Y, Vec3::Y);
}
