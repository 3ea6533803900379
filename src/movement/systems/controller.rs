//! Movement domain: drives each `PlayerController` against its avian3d body.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::movement::host::{LocomotionHost, LocomotionSpeeds, WallHit, WallProbe};
use crate::movement::{
    GroundContact, LocomotionMotor, MovementInput, MovementTuning, Player, PlayerController,
    RailContacts,
};
use crate::track::{RailSamplePoint, set_rail_collision};

/// Length of the capsule swept when probing for walls.
const WALL_PROBE_LENGTH: f32 = 1.25;

/// `LocomotionHost` backed by the player's ECS components.
///
/// Rail toggles are collected and applied after the tick, once the controller
/// no longer borrows the host.
pub(crate) struct AvianHost<'a, 'w, 's> {
    entity: Entity,
    transform: Mut<'a, Transform>,
    velocity: Mut<'a, LinearVelocity>,
    gravity: Mut<'a, GravityScale>,
    motor: Mut<'a, LocomotionMotor>,
    grounded: bool,
    spatial_query: &'a SpatialQuery<'w, 's>,
    rail_toggles: Vec<(Entity, bool)>,
}

impl LocomotionHost for AvianHost<'_, '_, '_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn velocity(&self) -> Vec3 {
        self.velocity.0
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity.0 = velocity;
    }

    fn teleport(&mut self, position: Vec3, rotation: Quat) {
        self.transform.translation = position;
        self.transform.rotation = rotation;
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn set_speeds(&mut self, speeds: LocomotionSpeeds) {
        if self.motor.speeds != speeds {
            self.motor.speeds = speeds;
        }
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        if self.gravity.0 != scale {
            self.gravity.0 = scale;
        }
    }

    fn cast_wall(&self, probe: &WallProbe) -> Option<WallHit> {
        let shape = Collider::capsule(probe.radius, WALL_PROBE_LENGTH);
        let filter =
            SpatialQueryFilter::from_mask(probe.layers).with_excluded_entities([self.entity]);

        let hit = self.spatial_query.cast_shape(
            &shape,
            self.transform.translation,
            self.transform.rotation,
            probe.direction,
            &ShapeCastConfig::from_max_distance(probe.distance),
            &filter,
        )?;

        Some(WallHit {
            point: hit.point1,
            normal: hit.normal1,
            distance: hit.distance,
        })
    }

    fn set_rail_enabled(&mut self, rail: Entity, enabled: bool) {
        self.rail_toggles.push((rail, enabled));
    }
}

pub(crate) fn tick_player_controllers(
    mut commands: Commands,
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    spatial_query: SpatialQuery,
    children: Query<&Children>,
    samples: Query<(), With<RailSamplePoint>>,
    mut players: Query<
        (
            Entity,
            &mut PlayerController,
            &mut Transform,
            &mut LinearVelocity,
            &mut GravityScale,
            &mut LocomotionMotor,
            &GroundContact,
            &mut RailContacts,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (entity, mut controller, transform, velocity, gravity, motor, ground, mut contacts) in
        &mut players
    {
        let mut host = AvianHost {
            entity,
            transform,
            velocity,
            gravity,
            motor,
            grounded: ground.grounded,
            spatial_query: &spatial_query,
            rail_toggles: Vec::new(),
        };

        controller.tick(&mut host, &input, &tuning, dt);

        for (rail, enabled) in host.rail_toggles {
            set_rail_collision(&mut commands, &children, &samples, rail, enabled);

            // Disabled sensors never report an end, so forget them now
            if !enabled && let Ok(rail_children) = children.get(rail) {
                for sample in rail_children.iter() {
                    contacts.remove(sample);
                }
            }
        }
    }
}
