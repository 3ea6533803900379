//! Movement domain: debug-only playground and state logging.

use std::collections::HashMap;

use avian3d::prelude::*;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::content::TrackLibrary;
use crate::movement::{GameLayer, Ground, MovementState, PlayerController, Wall};
use crate::track::{BezierTrack, ControlPointMode, TrackError, spawn_rail};

const FALLBACK_RAIL_SEED: u64 = 0x5EED;
const FALLBACK_SAMPLE_SPACING: f32 = 0.5;
const FALLBACK_SAMPLE_RADIUS: f32 = 0.35;

/// Builds a wandering S-shaped rail from a seed. Same seed, same rail.
pub(crate) fn generated_rail(seed: u64) -> Result<BezierTrack, TrackError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut points = Vec::with_capacity(7);
    let mut cursor = Vec3::new(2.0, 1.2, 3.0);
    for _ in 0..7 {
        points.push(cursor);
        cursor += Vec3::new(
            rng.random_range(1.5..2.5),
            rng.random_range(-0.2..0.3),
            rng.random_range(-1.5..1.5),
        );
    }

    let mut track = BezierTrack::from_points(
        points,
        vec![ControlPointMode::Free; 3],
        vec![0.0; 3],
        false,
    )?;
    track.set_control_point_mode(3, ControlPointMode::Aligned);
    track.prepare(FALLBACK_SAMPLE_SPACING)?;
    Ok(track)
}

fn spawn_block<M: Component>(
    commands: &mut Commands,
    marker: M,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec3,
    position: Vec3,
    layers: CollisionLayers,
) {
    commands.spawn((
        marker,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        layers,
    ));
}

pub(crate) fn spawn_playground(
    mut commands: Commands,
    library: Res<TrackLibrary>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let wall_color = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.3, 0.4),
        ..default()
    });
    let ground_color = materials.add(StandardMaterial {
        base_color: Color::srgb(0.4, 0.5, 0.4),
        ..default()
    });

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);

    // Floor, top face at y = 0
    let floor = Vec3::new(40.0, 1.0, 40.0);
    spawn_block(
        &mut commands,
        Ground,
        meshes.add(Cuboid::from_size(floor)),
        ground_color,
        floor,
        Vec3::new(0.0, -0.5, 0.0),
        ground_layers,
    );

    // Two parallel walls for wallriding practice
    let wall = Vec3::new(0.5, 6.0, 16.0);
    for x in [8.0, 14.0] {
        spawn_block(
            &mut commands,
            Wall,
            meshes.add(Cuboid::from_size(wall)),
            wall_color.clone(),
            wall,
            Vec3::new(x, 3.0, 6.0),
            wall_layers,
        );
    }

    if !library.rails.is_empty() {
        for rail in &library.rails {
            spawn_rail(&mut commands, &rail.id, rail.track.clone(), rail.sample_radius);
        }
        return;
    }

    match generated_rail(FALLBACK_RAIL_SEED) {
        Ok(track) => {
            info!("No rails loaded, spawning a generated rail");
            spawn_rail(&mut commands, "generated", track, FALLBACK_SAMPLE_RADIUS);
        }
        Err(e) => error!("Generated rail could not be built: {}", e),
    }
}

/// Logs every movement state change.
pub(crate) fn log_state_changes(
    mut last: Local<HashMap<Entity, MovementState>>,
    controllers: Query<(Entity, &PlayerController)>,
) {
    for (entity, controller) in &controllers {
        let state = controller.state();
        if last.insert(entity, state) != Some(state) {
            info!(
                "{:?} is now {} (speed {:.2})",
                entity,
                state,
                controller.speed()
            );
        }
    }
}

/// Draws the rail frame the walker is riding, roll included.
pub(crate) fn draw_grind_frames(mut gizmos: Gizmos, controllers: Query<&PlayerController>) {
    for controller in &controllers {
        let walker = controller.walker();
        if !controller.state().is_on_rail() || !walker.is_bound() {
            continue;
        }
        let frame =
            Transform::from_translation(walker.point()).with_rotation(walker.orientation());
        gizmos.axes(frame, 0.6);
    }
}
