//! Movement domain: ground probing and rail sensor contact tracking.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::{GameLayer, GroundContact, Player, RailContacts};
use crate::track::RailSamplePoint;

/// Distance below the capsule bottom that still counts as standing.
const GROUND_PROBE_DISTANCE: f32 = 0.1;

pub(crate) fn detect_ground(
    spatial_query: SpatialQuery,
    mut query: Query<(Entity, &Transform, &Collider, &mut GroundContact), With<Player>>,
) {
    for (entity, transform, collider, mut contact) in &mut query {
        let was_grounded = contact.grounded;

        // Only Ground layer entities count, and never the player itself
        let ground_filter =
            SpatialQueryFilter::from_mask(GameLayer::Ground).with_excluded_entities([entity]);

        let half_height = match collider.shape_scaled().as_capsule() {
            Some(capsule) => capsule.half_height() + capsule.radius,
            None => 0.9,
        };

        let hit = spatial_query.cast_ray(
            transform.translation,
            Dir3::NEG_Y,
            half_height + GROUND_PROBE_DISTANCE,
            true,
            &ground_filter,
        );

        contact.grounded = hit.is_some();
        contact.normal = hit.map_or(Vec3::Y, |hit| hit.normal);

        if contact.grounded && !was_grounded {
            debug!("Landed: normal={:?}", contact.normal);
        } else if !contact.grounded && was_grounded {
            debug!("Left ground");
        }
    }
}

/// Keeps `RailContacts` in sync with the rail sensors the player overlaps.
pub(crate) fn track_rail_contacts(
    mut collision_start_events: MessageReader<CollisionStart>,
    mut collision_end_events: MessageReader<CollisionEnd>,
    samples: Query<(), With<RailSamplePoint>>,
    mut players: Query<&mut RailContacts, With<Player>>,
) {
    for event in collision_start_events.read() {
        let (sample, other) = if samples.get(event.collider1).is_ok() {
            (event.collider1, event.collider2)
        } else if samples.get(event.collider2).is_ok() {
            (event.collider2, event.collider1)
        } else {
            continue;
        };

        if let Ok(mut contacts) = players.get_mut(other) {
            contacts.insert(sample);
        }
    }

    for event in collision_end_events.read() {
        let (sample, other) = if samples.get(event.collider1).is_ok() {
            (event.collider1, event.collider2)
        } else if samples.get(event.collider2).is_ok() {
            (event.collider2, event.collider1)
        } else {
            continue;
        };

        if let Ok(mut contacts) = players.get_mut(other) {
            contacts.remove(sample);
        }
    }
}
