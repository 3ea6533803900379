//! Track domain: a cursor that travels along a bound rail at constant speed.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::curve::BezierTrack;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum TrackDirection {
    #[default]
    Forward,
    Backward,
}

impl TrackDirection {
    pub fn sign(self) -> f32 {
        match self {
            TrackDirection::Forward => 1.0,
            TrackDirection::Backward => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            TrackDirection::Forward => TrackDirection::Backward,
            TrackDirection::Backward => TrackDirection::Forward,
        }
    }
}

/// The rail a walker is bound to: the owning entity and a snapshot of its curve.
#[derive(Debug, Clone)]
pub struct BoundTrack {
    pub entity: Entity,
    pub track: BezierTrack,
}

/// Walks a rail either by normalized parameter or by arc-length distance.
#[derive(Debug, Clone, Default)]
pub struct TrackWalker {
    bound: Option<BoundTrack>,
    /// When set, `position` is an arc-length distance instead of a parameter
    pub walk_by_distance: bool,
    pub position: f32,
    pub direction: TrackDirection,
}

impl TrackWalker {
    /// An unbound walker whose position is an arc-length distance.
    pub fn by_distance() -> Self {
        Self {
            walk_by_distance: true,
            ..default()
        }
    }

    /// Binds a rail, starting at its origin heading forward.
    pub fn bind(&mut self, entity: Entity, track: BezierTrack) {
        self.bound = Some(BoundTrack { entity, track });
        self.position = 0.0;
        self.direction = TrackDirection::Forward;
    }

    pub fn unbind(&mut self) {
        self.bound = None;
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn track(&self) -> Option<&BezierTrack> {
        self.bound.as_ref().map(|bound| &bound.track)
    }

    pub fn track_entity(&self) -> Option<Entity> {
        self.bound.as_ref().map(|bound| bound.entity)
    }

    pub fn reverse(&mut self) {
        self.direction = self.direction.reversed();
    }

    /// Arc length when walking by distance, otherwise 1.
    pub fn length(&self) -> f32 {
        match self.track() {
            Some(track) if self.walk_by_distance => track.arc_length(),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Current position expressed as an arc-length distance.
    pub fn distance(&self) -> f32 {
        match self.track() {
            Some(track) if !self.walk_by_distance => self.position * track.arc_length(),
            _ => self.position,
        }
    }

    pub fn point(&self) -> Vec3 {
        match self.track() {
            Some(track) if self.walk_by_distance => track.point_by_distance(self.position),
            Some(track) => track.point_at(self.position),
            None => Vec3::ZERO,
        }
    }

    /// Curve velocity at the current position, not adjusted for walking direction.
    pub fn tangent(&self) -> Vec3 {
        match self.track() {
            Some(track) if self.walk_by_distance => track.tangent_by_distance(self.position),
            Some(track) => track.tangent_at(self.position),
            None => Vec3::ZERO,
        }
    }

    pub fn orientation(&self) -> Quat {
        match self.track() {
            Some(track) if self.walk_by_distance => track.orientation_by_distance(self.position),
            Some(track) => track.orientation_at(self.position),
            None => Quat::IDENTITY,
        }
    }

    /// Moves `speed * dt` world units along the rail and returns the new point.
    ///
    /// The step is scaled by the ratio between the wanted distance and the chord
    /// a naive step would produce, so travel speed does not depend on how the
    /// curve's handles are spaced.
    pub fn advance_by_distance(&mut self, speed: f32, dt: f32) -> Option<Vec3> {
        let Some(track) = self.track() else {
            warn!("Walker advanced without a bound track");
            return None;
        };
        let arc_length = track.arc_length();
        if arc_length <= 0.0 {
            error!("Walker track has no cached arc length");
            return None;
        }

        let desired = speed * dt;
        if desired.abs() <= f32::EPSILON {
            return Some(self.point());
        }

        let current = self.distance();
        let mut trial = current + self.direction.sign() * desired;
        if track.is_loop() {
            trial = wrap(trial, arc_length);
        }
        let chord = track
            .point_by_distance(current)
            .distance(track.point_by_distance(trial));
        let multiplier = if chord > f32::EPSILON {
            desired.abs() / chord
        } else {
            1.0
        };
        let scale = if self.walk_by_distance {
            1.0
        } else {
            1.0 / arc_length
        };
        let is_loop = track.is_loop();

        self.position += self.direction.sign() * desired * multiplier * scale;
        if is_loop {
            self.position = wrap(self.position, self.length());
        }
        Some(self.point())
    }

    /// Moves the raw position by `rate * dt` without any speed correction.
    pub fn advance_by_time(&mut self, rate: f32, dt: f32) -> Option<Vec3> {
        let Some(track) = self.track() else {
            warn!("Walker advanced without a bound track");
            return None;
        };
        let is_loop = track.is_loop();

        self.position += self.direction.sign() * rate * dt;
        if is_loop {
            self.position = wrap(self.position, self.length());
        }
        Some(self.point())
    }

    /// True once a non-looping walk has left the rail on either end.
    pub fn is_finished(&self) -> bool {
        let Some(track) = self.track() else {
            return true;
        };
        if track.is_loop() {
            return false;
        }
        self.position < 0.0 || self.position > self.length()
    }
}

fn wrap(position: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return position;
    }
    let wrapped = position.rem_euclid(length);
    if wrapped >= length { 0.0 } else { wrapped }
}
