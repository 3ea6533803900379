//! Movement domain: deciding whether a touched rail sensor starts a grind.
//!
//! The ECS feed lives in `systems::detector`; everything here is plain data in,
//! decision out, so it can be exercised without a physics world.

use avian3d::prelude::CollisionLayers;
use bevy::prelude::*;

use crate::movement::{GameLayer, GrindRequest, MovementTuning, PlayerController};
use crate::track::BezierTrack;

#[derive(Debug, Clone, PartialEq)]
pub enum DetectorError {
    /// Sample sensor is not parented to anything
    Orphan(Entity),
    /// Parent exists but carries no `BezierTrack`
    NotARail { sample: Entity, parent: Entity },
    InvalidSampleName { sample: Entity, name: String },
}

impl std::fmt::Display for DetectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectorError::Orphan(sample) => {
                write!(f, "rail sample {:?} has no parent rail", sample)
            }
            DetectorError::NotARail { sample, parent } => write!(
                f,
                "parent {:?} of rail sample {:?} has no track",
                parent, sample
            ),
            DetectorError::InvalidSampleName { sample, name } => write!(
                f,
                "rail sample {:?} is named '{}', expected a sample index",
                sample, name
            ),
        }
    }
}

impl std::error::Error for DetectorError {}

/// What the detector knows about a touched sensor.
#[derive(Debug, Clone, Copy)]
pub struct SampleContact<'a> {
    pub sample: Entity,
    pub layers: CollisionLayers,
    pub name: Option<&'a str>,
    /// Parent entity and its track, when it has one
    pub rail: Option<(Entity, Option<&'a BezierTrack>)>,
}

pub fn is_eligible(controller: &PlayerController, tuning: &MovementTuning) -> bool {
    tuning.grinding_enabled && controller.can_acquire(tuning)
}

pub fn parse_sample_index(name: &str) -> Option<usize> {
    name.trim().parse().ok()
}

/// Turns a contact into a grind request.
///
/// Sensors outside `rail_layer` resolve to `Ok(None)` and are ignored silently;
/// rail sensors that cannot be resolved are errors for the caller to log.
pub fn resolve_contact(
    contact: &SampleContact<'_>,
    rail_layer: GameLayer,
) -> Result<Option<GrindRequest>, DetectorError> {
    if !contact.layers.memberships.has_all(rail_layer) {
        return Ok(None);
    }

    let Some((rail, track)) = contact.rail else {
        return Err(DetectorError::Orphan(contact.sample));
    };
    let Some(track) = track else {
        return Err(DetectorError::NotARail {
            sample: contact.sample,
            parent: rail,
        });
    };

    let name = contact.name.unwrap_or_default();
    let Some(sample_index) = parse_sample_index(name) else {
        return Err(DetectorError::InvalidSampleName {
            sample: contact.sample,
            name: name.to_string(),
        });
    };

    Ok(Some(GrindRequest {
        rail,
        track: track.clone(),
        sample_index,
    }))
}
