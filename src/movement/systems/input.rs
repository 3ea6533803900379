//! Movement domain: input sampling for locomotion.

use bevy::prelude::*;

use crate::movement::{JumpBinding, MovementInput};

pub(crate) fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    binding: Res<JumpBinding>,
    mut input: ResMut<MovementInput>,
) {
    // Strafe axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    // Forward axis
    let mut y = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1.0;
    }

    let mut turn = 0.0;
    if keyboard.pressed(KeyCode::KeyQ) {
        turn += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        turn -= 1.0;
    }

    input.axis = Vec2::new(x, y).clamp_length_max(1.0);
    input.turn = turn;
    input.jump_pressed = keyboard.any_just_pressed(binding.keys.iter().copied());
    input.jump_held = keyboard.any_pressed(binding.keys.iter().copied());
    input.jump_bound = binding.is_bound();
}
