//! Track domain: orientation helpers shared by curves, walkers and the controller.

use bevy::prelude::*;

/// Builds a rotation whose forward (-Z) points along `forward` and whose up (+Y)
/// leans towards `up`.
///
/// Falls back to the X axis as reference when `forward` is parallel to `up`, and
/// to `Quat::IDENTITY` when `forward` is zero.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let mut right = forward.cross(up).normalize_or_zero();
    if right.length_squared() < 0.001 {
        right = forward.cross(Vec3::X).normalize_or_zero();
    }
    let corrected_up = right.cross(forward).normalize_or_zero();

    Quat::from_mat3(&Mat3::from_cols(right, corrected_up, -forward))
}

/// Angle in degrees between two vectors, zero when either one is degenerate.
pub fn angle_degrees(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Moves `current` towards `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}
