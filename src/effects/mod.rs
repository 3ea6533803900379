//! Effects domain: mirrors controller telemetry into effect messages and replica snapshots.

mod replication;
mod telemetry;

pub use replication::{
    RemoteMovement, ReplicatedMovement, ReplicationError, ReplicationOutbox, decode_snapshot,
    encode_snapshot,
};
pub use telemetry::{
    GrindSparks, MovementEffect, MovementEffectKind, PlayerTelemetry, WallrideDust,
    anchor_local_transform, sparks_local_rotation,
};

use bevy::prelude::*;

use crate::movement::MovementSet;
use replication::queue_replication;
use telemetry::{
    attach_telemetry, emit_movement_effects, log_movement_effects, mirror_telemetry,
    orient_grind_sparks, place_wallride_dust,
};

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MovementEffect>()
            .init_resource::<ReplicationOutbox>()
            .add_systems(
                Update,
                (
                    attach_telemetry,
                    mirror_telemetry,
                    emit_movement_effects,
                    log_movement_effects,
                    orient_grind_sparks,
                    place_wallride_dust,
                    queue_replication,
                )
                    .chain()
                    .after(MovementSet),
            );
    }
}
