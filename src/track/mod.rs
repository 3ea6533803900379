//! Track domain: Bezier rails, arc-length sampling and the walker that rides them.

mod curve;
pub mod frame;
mod sampling;
mod spawn;
mod walker;

use bevy::prelude::*;

pub use curve::{BezierTrack, ControlPointMode, TrackError};
pub use frame::{angle_degrees, look_rotation, move_towards};
pub use sampling::{ARC_LENGTH_SAMPLES, DEFAULT_NORMAL_SAMPLES};
pub use spawn::{Rail, RailSamplePoint, set_rail_collision, spawn_rail};
pub use walker::{BoundTrack, TrackDirection, TrackWalker};

#[cfg(test)]
mod tests;

pub struct TrackPlugin;

impl Plugin for TrackPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BezierTrack>()
            .register_type::<ControlPointMode>()
            .register_type::<TrackDirection>()
            .register_type::<Rail>()
            .register_type::<RailSamplePoint>();

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, spawn::draw_rails);
    }
}
