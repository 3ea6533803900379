//! Effects domain: per-tick telemetry mirror, effect messages and the sparks and dust anchors.

use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::movement::{MovementEvents, MovementState, MovementTuning, PlayerController};

/// Read-only copy of the controller's outputs, refreshed once per tick.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerTelemetry {
    pub state: MovementState,
    /// Current speed over the max grind speed, in [0, 1]
    pub scaled_speed: f32,
    pub grind_orientation: Quat,
    pub events: MovementEvents,
    pub falling: bool,
    pub grind_on_cooldown: bool,
    /// Contact point and outward orientation of the wall being ridden or jumped from
    pub wall_contact: Option<(Vec3, Quat)>,
}

impl Default for PlayerTelemetry {
    fn default() -> Self {
        Self {
            state: MovementState::Aerial,
            scaled_speed: 0.0,
            grind_orientation: Quat::IDENTITY,
            events: MovementEvents::empty(),
            falling: true,
            grind_on_cooldown: false,
            wall_contact: None,
        }
    }
}

impl PlayerTelemetry {
    pub fn capture(controller: &PlayerController, tuning: &MovementTuning) -> Self {
        Self {
            state: controller.state(),
            scaled_speed: controller.scaled_speed(tuning),
            grind_orientation: controller.grind_orientation(),
            events: controller.events(),
            falling: controller.is_falling(),
            grind_on_cooldown: controller.is_grind_on_cooldown(),
            wall_contact: controller
                .wallride_point()
                .zip(controller.wallride_orientation()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementEffectKind {
    DoubleJump,
    WallJump,
    GrindStart,
    GrindStop,
}

impl MovementEffectKind {
    pub const ALL: [MovementEffectKind; 4] = [
        MovementEffectKind::DoubleJump,
        MovementEffectKind::WallJump,
        MovementEffectKind::GrindStart,
        MovementEffectKind::GrindStop,
    ];

    pub fn flag(self) -> MovementEvents {
        match self {
            MovementEffectKind::DoubleJump => MovementEvents::DOUBLE_JUMPED,
            MovementEffectKind::WallJump => MovementEvents::WALL_JUMPED,
            MovementEffectKind::GrindStart => MovementEvents::GRIND_STARTED,
            MovementEffectKind::GrindStop => MovementEvents::GRIND_STOPPED,
        }
    }

    /// Every effect whose flag is set, in a fixed order.
    pub fn from_events(events: MovementEvents) -> impl Iterator<Item = MovementEffectKind> {
        Self::ALL
            .into_iter()
            .filter(move |kind| events.contains(kind.flag()))
    }
}

/// Written once per set event flag per tick, for audio and animation to consume.
#[derive(Debug, Clone, Copy)]
pub struct MovementEffect {
    pub entity: Entity,
    pub kind: MovementEffectKind,
}

impl Message for MovementEffect {}

/// Child transform that follows the grind orientation while on a rail.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GrindSparks;

/// Child transform pinned to the wall contact while wallriding.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WallrideDust;

/// Rotation to give the sparks so that, under the player's rotation, they face along the rail.
pub fn sparks_local_rotation(player_rotation: Quat, grind_orientation: Quat) -> Quat {
    (player_rotation.inverse() * grind_orientation).normalize()
}

/// Local transform that puts a child of `player` at a world-space point and rotation.
pub fn anchor_local_transform(player: &Transform, point: Vec3, orientation: Quat) -> Transform {
    let inverse = player.rotation.inverse();
    Transform::from_translation(inverse * (point - player.translation))
        .with_rotation(sparks_local_rotation(player.rotation, orientation))
}

// ============================================================================
// Systems
// ============================================================================

pub(crate) fn attach_telemetry(
    mut commands: Commands,
    players: Query<Entity, Added<PlayerController>>,
) {
    for entity in &players {
        commands
            .entity(entity)
            .insert(PlayerTelemetry::default())
            .with_children(|player| {
                player.spawn((
                    Name::new("Grind Sparks"),
                    GrindSparks,
                    Transform::default(),
                    Visibility::Hidden,
                ));
                player.spawn((
                    Name::new("Wallride Dust"),
                    WallrideDust,
                    Transform::default(),
                    Visibility::Hidden,
                ));
            });
    }
}

pub(crate) fn mirror_telemetry(
    tuning: Res<MovementTuning>,
    mut players: Query<(&PlayerController, &mut PlayerTelemetry)>,
) {
    for (controller, mut telemetry) in &mut players {
        let next = PlayerTelemetry::capture(controller, &tuning);
        if *telemetry != next {
            *telemetry = next;
        }
    }
}

pub(crate) fn emit_movement_effects(
    players: Query<(Entity, &PlayerTelemetry)>,
    mut effects: MessageWriter<MovementEffect>,
) {
    for (entity, telemetry) in &players {
        for kind in MovementEffectKind::from_events(telemetry.events) {
            effects.write(MovementEffect { entity, kind });
        }
    }
}

pub(crate) fn log_movement_effects(mut effects: MessageReader<MovementEffect>) {
    for effect in effects.read() {
        debug!("{:?}: {:?}", effect.entity, effect.kind);
    }
}

pub(crate) fn orient_grind_sparks(
    players: Query<(&PlayerTelemetry, &Transform, &Children), Without<GrindSparks>>,
    mut sparks: Query<(&mut Transform, &mut Visibility), With<GrindSparks>>,
) {
    for (telemetry, player_transform, children) in &players {
        for child in children.iter() {
            let Ok((mut transform, mut visibility)) = sparks.get_mut(child) else {
                continue;
            };

            if telemetry.state.is_on_rail() {
                transform.rotation =
                    sparks_local_rotation(player_transform.rotation, telemetry.grind_orientation);
                *visibility = Visibility::Inherited;
            } else {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

pub(crate) fn place_wallride_dust(
    players: Query<(&PlayerTelemetry, &Transform, &Children), Without<WallrideDust>>,
    mut dust: Query<(&mut Transform, &mut Visibility), With<WallrideDust>>,
) {
    for (telemetry, player_transform, children) in &players {
        for child in children.iter() {
            let Ok((mut transform, mut visibility)) = dust.get_mut(child) else {
                continue;
            };

            match telemetry.wall_contact {
                Some((point, orientation)) if telemetry.state == MovementState::Wallride => {
                    *transform = anchor_local_transform(player_transform, point, orientation);
                    *visibility = Visibility::Inherited;
                }
                _ => *visibility = Visibility::Hidden,
            }
        }
    }
}
