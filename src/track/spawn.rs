//! Track domain: rail entities and their collision sample points.

use avian3d::prelude::*;
use bevy::prelude::*;

use super::curve::BezierTrack;
use crate::movement::GameLayer;

/// A grindable rail. The entity also carries its `BezierTrack`.
#[derive(Component, Debug, Clone, Reflect)]
pub struct Rail {
    pub id: String,
    pub sample_radius: f32,
}

/// Sensor placed along a rail. Its `Name` is the sample index.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
pub struct RailSamplePoint;

/// Spawns a rail with one trigger sphere per cached sample point.
///
/// The track must already be prepared; a rail without sample points can still be
/// walked but never acquired.
pub fn spawn_rail(
    commands: &mut Commands,
    id: &str,
    track: BezierTrack,
    sample_radius: f32,
) -> Entity {
    if track.sample_point_count() == 0 {
        warn!("Rail '{}' has no sample points and cannot be grabbed", id);
    }

    let samples: Vec<(usize, Vec3, Quat)> = track
        .sample_points()
        .iter()
        .enumerate()
        .map(|(index, &t)| (index, track.point_at(t), track.orientation_at(t)))
        .collect();

    info!(
        "Spawning rail '{}': {} segments, length {:.2}, {} sample points",
        id,
        track.segment_count(),
        track.arc_length(),
        samples.len()
    );

    let sample_layers = CollisionLayers::new(GameLayer::Rail, [GameLayer::Player]);

    commands
        .spawn((
            Name::new(format!("Rail {}", id)),
            Rail {
                id: id.to_string(),
                sample_radius,
            },
            track,
            Transform::default(),
            Visibility::default(),
            RigidBody::Static,
        ))
        .with_children(|rail| {
            for (index, point, rotation) in samples {
                rail.spawn((
                    Name::new(index.to_string()),
                    RailSamplePoint,
                    Transform::from_translation(point).with_rotation(rotation),
                    Collider::sphere(sample_radius),
                    Sensor,
                    CollisionEventsEnabled,
                    sample_layers,
                ));
            }
        })
        .id()
}

/// Enables or disables every sample sensor of `rail`.
pub fn set_rail_collision(
    commands: &mut Commands,
    children: &Query<&Children>,
    samples: &Query<(), With<RailSamplePoint>>,
    rail: Entity,
    enabled: bool,
) {
    let Ok(rail_children) = children.get(rail) else {
        warn!("Rail {:?} has no sample points to toggle", rail);
        return;
    };

    for child in rail_children.iter() {
        if samples.get(child).is_err() {
            continue;
        }
        if enabled {
            commands.entity(child).remove::<ColliderDisabled>();
        } else {
            commands.entity(child).insert(ColliderDisabled);
        }
    }
    debug!("Rail {:?} collision enabled={}", rail, enabled);
}

/// Draws every rail as a polyline.
#[cfg(feature = "dev-tools")]
pub(crate) fn draw_rails(mut gizmos: Gizmos, rails: Query<&BezierTrack, With<Rail>>) {
    const STEPS: usize = 96;
    for track in &rails {
        let color = if track.is_loop() {
            Color::srgb(0.9, 0.6, 0.2)
        } else {
            Color::srgb(0.8, 0.8, 0.3)
        };
        let mut previous = track.point_at(0.0);
        for i in 1..=STEPS {
            let point = track.point_at(i as f32 / STEPS as f32);
            gizmos.line(previous, point, color);
            previous = point;
        }

        // Boundaries, rolled ones marked with their tilted up vector
        for index in (0..track.control_point_count()).step_by(3) {
            let Some(point) = track.control_point(index) else {
                continue;
            };
            let roll = track.control_point_roll(index);
            if roll == 0.0 {
                gizmos.sphere(Isometry3d::from_translation(point), 0.06, color);
                continue;
            }
            let t = index as f32 / (track.control_point_count() - 1) as f32;
            let up = Quat::from_axis_angle(track.direction_at(t), -roll.to_radians()) * Vec3::Y;
            gizmos.line(point, point + up * 0.4, Color::srgb(0.9, 0.3, 0.3));
        }
    }
}
