//! Movement domain: queues grinds for rail sensors the player is touching.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::detector::{SampleContact, is_eligible, resolve_contact};
use crate::movement::{MovementTuning, Player, PlayerController, RailContacts, RailDetector};
use crate::track::BezierTrack;

pub(crate) fn detect_rail_contacts(
    tuning: Res<MovementTuning>,
    samples: Query<(&CollisionLayers, Option<&Name>, Option<&ChildOf>)>,
    rails: Query<&BezierTrack>,
    mut players: Query<(&RailDetector, &RailContacts, &mut PlayerController), With<Player>>,
) {
    for (detector, contacts, mut controller) in &mut players {
        if contacts.touching.is_empty()
            || controller.has_pending_grind()
            || !is_eligible(&controller, &tuning)
        {
            continue;
        }

        for &sample in &contacts.touching {
            let Ok((layers, name, parent)) = samples.get(sample) else {
                continue;
            };

            let contact = SampleContact {
                sample,
                layers: *layers,
                name: name.map(|name| name.as_str()),
                rail: parent.map(|parent| {
                    let rail = parent.parent();
                    (rail, rails.get(rail).ok())
                }),
            };

            match resolve_contact(&contact, detector.rail_layer) {
                Ok(Some(request)) => {
                    debug!(
                        "Rail sample {:?} touched, requesting grind on {:?}",
                        sample, request.rail
                    );
                    controller.request_grind(request);
                    break;
                }
                Ok(None) => {}
                Err(err) => warn!("Skipping rail contact: {}", err),
            }
        }
    }
}
