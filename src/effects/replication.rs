//! Effects domain: snapshots of the authoritative controller for remote replicas.
//!
//! Replicas never run the state machine. They read the latest snapshot on their
//! own cadence and must cope with stale data.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::telemetry::PlayerTelemetry;
use crate::movement::{MovementEvents, MovementState};

/// Wire shape of one player's movement for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicatedMovement {
    pub state_id: u8,
    pub scaled_speed: f32,
    pub orientation: Quat,
    pub events: u8,
}

impl From<&PlayerTelemetry> for ReplicatedMovement {
    fn from(telemetry: &PlayerTelemetry) -> Self {
        Self {
            state_id: telemetry.state.id(),
            scaled_speed: telemetry.scaled_speed,
            orientation: telemetry.grind_orientation,
            events: telemetry.events.bits(),
        }
    }
}

/// What a replica applies after decoding a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteMovement {
    pub state: MovementState,
    pub scaled_speed: f32,
    pub orientation: Quat,
    pub events: MovementEvents,
}

#[derive(Debug)]
pub enum ReplicationError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl std::fmt::Display for ReplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplicationError::Encode(e) => write!(f, "Failed to encode movement snapshot: {}", e),
            ReplicationError::Decode(e) => write!(f, "Failed to decode movement snapshot: {}", e),
        }
    }
}

impl std::error::Error for ReplicationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplicationError::Encode(e) | ReplicationError::Decode(e) => Some(e),
        }
    }
}

pub fn encode_snapshot(snapshot: &ReplicatedMovement) -> Result<String, ReplicationError> {
    serde_json::to_string(snapshot).map_err(ReplicationError::Encode)
}

/// Parses a snapshot. Unknown state ids are logged and read as `Aerial`;
/// unknown event bits are dropped.
pub fn decode_snapshot(payload: &str) -> Result<RemoteMovement, ReplicationError> {
    let snapshot: ReplicatedMovement =
        serde_json::from_str(payload).map_err(ReplicationError::Decode)?;

    let state = MovementState::try_from(snapshot.state_id).unwrap_or_else(|id| {
        error!("Snapshot carries unknown movement state id {}", id);
        MovementState::Aerial
    });

    Ok(RemoteMovement {
        state,
        scaled_speed: snapshot.scaled_speed.clamp(0.0, 1.0),
        orientation: snapshot.orientation,
        events: MovementEvents::from_bits_truncate(snapshot.events),
    })
}

/// Encoded snapshots for the current tick, one per player.
#[derive(Resource, Debug, Default)]
pub struct ReplicationOutbox {
    pub tick: u64,
    pub payloads: Vec<(Entity, String)>,
}

pub(crate) fn queue_replication(
    mut outbox: ResMut<ReplicationOutbox>,
    players: Query<(Entity, &PlayerTelemetry)>,
) {
    outbox.tick += 1;
    outbox.payloads.clear();

    for (entity, telemetry) in &players {
        match encode_snapshot(&ReplicatedMovement::from(telemetry)) {
            Ok(payload) => outbox.payloads.push((entity, payload)),
            Err(e) => error!("{:?}: {}", entity, e),
        }
    }
}
