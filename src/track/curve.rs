//! Track domain: piecewise cubic Bezier rail geometry and authoring edits.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::track::frame::look_rotation;

/// Tangent continuity enforced at a shared boundary point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum ControlPointMode {
    #[default]
    Free,
    /// Opposite handle stays colinear but keeps its own length
    Aligned,
    /// Opposite handle is the exact reflection
    Mirrored,
}

/// Errors raised by track queries and structural edits.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    InvalidPointCount(usize),
    ModeCountMismatch { expected: usize, found: usize },
    MissingArcLength,
    InvalidSpacing(f32),
    SegmentOutOfRange { segment: usize, count: usize },
    LastSegment,
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackError::InvalidPointCount(count) => write!(
                f,
                "track needs 3k+1 control points (k >= 1), got {}",
                count
            ),
            TrackError::ModeCountMismatch { expected, found } => write!(
                f,
                "track needs {} boundary modes, got {}",
                expected, found
            ),
            TrackError::MissingArcLength => write!(
                f,
                "track does not have a cached arc length or is zero length"
            ),
            TrackError::InvalidSpacing(spacing) => {
                write!(f, "sample point spacing must be positive, got {}", spacing)
            }
            TrackError::SegmentOutOfRange { segment, count } => write!(
                f,
                "segment {} is out of range for a track with {} segments",
                segment, count
            ),
            TrackError::LastSegment => write!(f, "cannot remove the last remaining segment"),
        }
    }
}

impl std::error::Error for TrackError {}

/// A grindable rail made of cubic Bezier segments sharing boundary points.
///
/// Control points are stored in world space. Boundary `i` (control point `3 * i`)
/// owns `modes[i]` and `rolls[i]`. Queries never mutate the track; every edit
/// drops the cached arc length and the sampled data derived from it.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct BezierTrack {
    pub(super) points: Vec<Vec3>,
    pub(super) modes: Vec<ControlPointMode>,
    /// Roll in degrees per boundary
    pub(super) rolls: Vec<f32>,
    pub(super) is_loop: bool,
    pub(super) cached_arc_length: f32,
    /// Parametric position of each collision sample point
    pub(super) sample_points_t: Vec<f32>,
    /// Evenly spaced (in t) up vectors used to keep the rail frame from flipping
    pub(super) sampled_normals: Vec<Vec3>,
}

impl Default for BezierTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl BezierTrack {
    /// A single straight segment along +X.
    pub fn new() -> Self {
        Self {
            points: vec![
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
            ],
            modes: vec![ControlPointMode::Free; 2],
            rolls: vec![0.0; 2],
            is_loop: false,
            cached_arc_length: 0.0,
            sample_points_t: Vec::new(),
            sampled_normals: Vec::new(),
        }
    }

    /// Builds a track from authored data.
    ///
    /// A roll list whose length does not match the boundary count is kept as-is and
    /// makes `orientation_at` ignore rolls.
    pub fn from_points(
        points: Vec<Vec3>,
        modes: Vec<ControlPointMode>,
        rolls: Vec<f32>,
        is_loop: bool,
    ) -> Result<Self, TrackError> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(TrackError::InvalidPointCount(points.len()));
        }

        let expected = (points.len() - 1) / 3 + 1;
        if modes.len() != expected {
            return Err(TrackError::ModeCountMismatch {
                expected,
                found: modes.len(),
            });
        }

        let mut track = Self {
            points,
            modes,
            rolls,
            is_loop: false,
            cached_arc_length: 0.0,
            sample_points_t: Vec::new(),
            sampled_normals: Vec::new(),
        };
        if is_loop {
            track.set_loop(true);
        }
        Ok(track)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn control_point_count(&self) -> usize {
        self.points.len()
    }

    pub fn control_point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn modes(&self) -> &[ControlPointMode] {
        &self.modes
    }

    pub fn rolls(&self) -> &[f32] {
        &self.rolls
    }

    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    pub fn arc_length(&self) -> f32 {
        self.cached_arc_length
    }

    pub fn is_cached(&self) -> bool {
        self.cached_arc_length > 0.0
    }

    /// Rolls only take part in orientation when there is one per boundary.
    pub fn has_rolls(&self) -> bool {
        self.rolls.len() == self.modes.len()
    }

    pub fn segment_count(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    /// Index of the first control point of the segment containing `t`.
    pub fn segment_index(&self, t: f32) -> usize {
        if t >= 1.0 {
            return self.points.len() - 4;
        }
        let scaled = t.clamp(0.0, 1.0) * self.segment_count() as f32;
        (scaled.floor() as usize).min(self.segment_count() - 1) * 3
    }

    /// Position of `t` inside its segment, in `[0, 1]`.
    pub fn segment_value(&self, t: f32) -> f32 {
        if t >= 1.0 {
            return 1.0;
        }
        let scaled = t.clamp(0.0, 1.0) * self.segment_count() as f32;
        scaled - scaled.floor()
    }

    // -------------------------------------------------------------------------
    // Parametric queries
    // -------------------------------------------------------------------------

    pub fn point_at(&self, t: f32) -> Vec3 {
        let i = self.segment_index(t);
        bezier_point(
            self.points[i],
            self.points[i + 1],
            self.points[i + 2],
            self.points[i + 3],
            self.segment_value(t),
        )
    }

    /// First derivative of the segment containing `t` (not normalized).
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let i = self.segment_index(t);
        bezier_tangent(
            self.points[i],
            self.points[i + 1],
            self.points[i + 2],
            self.points[i + 3],
            self.segment_value(t),
        )
    }

    pub fn direction_at(&self, t: f32) -> Vec3 {
        self.tangent_at(t).normalize_or_zero()
    }

    /// `up x tangent`, with the sampled normals as `up` once they are cached.
    pub fn binormal_at(&self, t: f32) -> Vec3 {
        let tangent = self.direction_at(t);
        let up = self.sampled_up(t).unwrap_or(Vec3::Y);
        let binormal = up.cross(tangent).normalize_or_zero();
        if binormal == Vec3::ZERO {
            Vec3::X.cross(tangent).normalize_or_zero()
        } else {
            binormal
        }
    }

    pub fn normal_at(&self, t: f32) -> Vec3 {
        self.direction_at(t)
            .cross(self.binormal_at(t))
            .normalize_or_zero()
    }

    /// Roll in degrees, blended linearly between the two enclosing boundaries.
    pub fn roll_at(&self, t: f32) -> f32 {
        if !self.has_rolls() {
            return 0.0;
        }
        let boundary = self.segment_index(t) / 3;
        self.rolls[boundary].lerp(self.rolls[boundary + 1], self.segment_value(t))
    }

    pub fn orientation_at(&self, t: f32) -> Quat {
        let forward = self.direction_at(t);
        if !self.has_rolls() {
            return look_rotation(forward, Vec3::Y);
        }
        look_rotation(forward, self.normal_at(t))
            * Quat::from_rotation_z(self.roll_at(t).to_radians())
    }

    fn sampled_up(&self, t: f32) -> Option<Vec3> {
        let count = self.sampled_normals.len();
        if count < 2 {
            return None;
        }
        let scaled = t.clamp(0.0, 1.0) * (count - 1) as f32;
        let i = (scaled.floor() as usize).min(count - 2);
        let up = self.sampled_normals[i]
            .lerp(self.sampled_normals[i + 1], scaled - i as f32)
            .normalize_or_zero();
        (up != Vec3::ZERO).then_some(up)
    }

    // -------------------------------------------------------------------------
    // Distance queries
    // -------------------------------------------------------------------------

    pub fn t_at_distance(&self, distance: f32) -> Result<f32, TrackError> {
        if !self.is_cached() {
            return Err(TrackError::MissingArcLength);
        }
        Ok(distance / self.cached_arc_length)
    }

    pub fn distance_at(&self, t: f32) -> Result<f32, TrackError> {
        if !self.is_cached() {
            return Err(TrackError::MissingArcLength);
        }
        Ok(t * self.cached_arc_length)
    }

    pub fn point_by_distance(&self, distance: f32) -> Vec3 {
        match self.t_at_distance(distance) {
            Ok(t) => self.point_at(t),
            Err(err) => {
                error!("{}", err);
                Vec3::ZERO
            }
        }
    }

    pub fn tangent_by_distance(&self, distance: f32) -> Vec3 {
        match self.t_at_distance(distance) {
            Ok(t) => self.tangent_at(t),
            Err(err) => {
                error!("{}", err);
                Vec3::ZERO
            }
        }
    }

    pub fn orientation_by_distance(&self, distance: f32) -> Quat {
        match self.t_at_distance(distance) {
            Ok(t) => self.orientation_at(t),
            Err(err) => {
                error!("{}", err);
                Quat::IDENTITY
            }
        }
    }

    // -------------------------------------------------------------------------
    // Authoring edits
    // -------------------------------------------------------------------------

    /// Moves a control point. Moving a boundary carries both of its handles along.
    pub fn set_control_point(&mut self, index: usize, point: Vec3) {
        let len = self.points.len();
        if index >= len {
            warn!("Control point {} out of range ({} points)", index, len);
            return;
        }

        if index % 3 == 0 {
            let delta = point - self.points[index];
            if self.is_loop {
                if index == 0 {
                    self.points[1] += delta;
                    self.points[len - 2] += delta;
                    self.points[len - 1] = point;
                } else if index == len - 1 {
                    self.points[0] = point;
                    self.points[1] += delta;
                    self.points[index - 1] += delta;
                } else {
                    self.points[index - 1] += delta;
                    self.points[index + 1] += delta;
                }
            } else {
                if index > 0 {
                    self.points[index - 1] += delta;
                }
                if index + 1 < len {
                    self.points[index + 1] += delta;
                }
            }
        }

        self.points[index] = point;
        self.enforce_mode(index);
        self.invalidate();
    }

    pub fn control_point_mode(&self, index: usize) -> ControlPointMode {
        self.modes
            .get((index + 1) / 3)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_control_point_mode(&mut self, index: usize, mode: ControlPointMode) {
        let mode_index = (index + 1) / 3;
        if mode_index >= self.modes.len() {
            warn!("Control point {} has no boundary mode", index);
            return;
        }

        self.modes[mode_index] = mode;
        if self.is_loop {
            let last = self.modes.len() - 1;
            if mode_index == 0 {
                self.modes[last] = mode;
            } else if mode_index == last {
                self.modes[0] = mode;
            }
        }
        self.enforce_mode(index);
        self.invalidate();
    }

    pub fn control_point_roll(&self, index: usize) -> f32 {
        self.rolls.get((index + 1) / 3).copied().unwrap_or(0.0)
    }

    /// Sets the roll of the boundary owning `index`, upgrading a legacy roll list
    /// to one entry per boundary first.
    pub fn set_control_point_roll(&mut self, index: usize, roll: f32) {
        let mode_index = (index + 1) / 3;
        if mode_index >= self.modes.len() {
            warn!("Control point {} has no boundary roll", index);
            return;
        }
        if !self.has_rolls() {
            debug!(
                "Resizing roll list from {} to {} entries",
                self.rolls.len(),
                self.modes.len()
            );
            self.rolls.resize(self.modes.len(), 0.0);
        }

        self.rolls[mode_index] = roll;
        if self.is_loop {
            let last = self.rolls.len() - 1;
            if mode_index == 0 {
                self.rolls[last] = roll;
            } else if mode_index == last {
                self.rolls[0] = roll;
            }
        }
        self.invalidate();
    }

    /// Re-applies the boundary mode around `index`, moving the handle opposite to
    /// the one that was just edited.
    pub fn enforce_mode(&mut self, index: usize) {
        let mode_index = (index + 1) / 3;
        let Some(&mode) = self.modes.get(mode_index) else {
            return;
        };
        let last = self.modes.len() - 1;
        if mode == ControlPointMode::Free
            || (!self.is_loop && (mode_index == 0 || mode_index == last))
        {
            return;
        }

        let len = self.points.len();
        let middle = mode_index * 3;
        let before = if middle == 0 { len - 2 } else { middle - 1 };
        let after = if middle + 1 >= len { 1 } else { middle + 1 };
        let (fixed, enforced) = if index <= middle {
            (before, after)
        } else {
            (after, before)
        };

        let center = self.points[middle];
        let offset = center - self.points[fixed];
        self.points[enforced] = match mode {
            ControlPointMode::Aligned => {
                let direction = offset.normalize_or_zero();
                if direction == Vec3::ZERO {
                    return;
                }
                center + direction * center.distance(self.points[enforced])
            }
            ControlPointMode::Mirrored => center + offset,
            ControlPointMode::Free => return,
        };
    }

    /// Closes or opens the track. Closing copies the first boundary onto the last.
    pub fn set_loop(&mut self, value: bool) {
        self.is_loop = value;
        if value {
            let last = self.modes.len() - 1;
            self.modes[last] = self.modes[0];
            if self.has_rolls() {
                self.rolls[last] = self.rolls[0];
            }
            let first = self.points[0];
            self.set_control_point(0, first);
        }
        self.invalidate();
    }

    /// Appends a straight segment continuing along +X from the last point.
    pub fn add_curve(&mut self) {
        let mut point = self.points[self.points.len() - 1];
        for _ in 0..3 {
            point.x += 1.0;
            self.points.push(point);
        }

        let last_mode = self.modes[self.modes.len() - 1];
        let rolls_tracked = self.has_rolls();
        self.modes.push(last_mode);
        if rolls_tracked {
            let last_roll = self.rolls[self.rolls.len() - 1];
            self.rolls.push(last_roll);
        }

        let len = self.points.len();
        self.enforce_mode(len - 4);
        if self.is_loop {
            self.close_seam();
        }
        self.invalidate();
    }

    /// Drops the last segment. Refused when it is the only one.
    pub fn remove_curve(&mut self) -> Result<(), TrackError> {
        let last = self.segment_count() - 1;
        self.remove_curve_at(last)
    }

    /// Splits `segment` in half without changing the curve's shape.
    pub fn insert_curve_at(&mut self, segment: usize) -> Result<(), TrackError> {
        let count = self.segment_count();
        if segment >= count {
            return Err(TrackError::SegmentOutOfRange { segment, count });
        }

        let i = segment * 3;
        let (p0, p1, p2, p3) = (
            self.points[i],
            self.points[i + 1],
            self.points[i + 2],
            self.points[i + 3],
        );
        let a = p0.lerp(p1, 0.5);
        let b = p1.lerp(p2, 0.5);
        let c = p2.lerp(p3, 0.5);
        let d = a.lerp(b, 0.5);
        let e = b.lerp(c, 0.5);
        let middle = d.lerp(e, 0.5);

        let rolls_tracked = self.has_rolls();
        self.points.splice(i + 1..i + 3, [a, d, middle, e, c]);
        self.modes.insert(segment + 1, ControlPointMode::Aligned);
        if rolls_tracked {
            let roll = (self.rolls[segment] + self.rolls[segment + 1]) * 0.5;
            self.rolls.insert(segment + 1, roll);
        }

        self.invalidate();
        Ok(())
    }

    /// Removes `segment`; the following segment starts where the removed one did.
    pub fn remove_curve_at(&mut self, segment: usize) -> Result<(), TrackError> {
        let count = self.segment_count();
        if count <= 1 {
            return Err(TrackError::LastSegment);
        }
        if segment >= count {
            return Err(TrackError::SegmentOutOfRange { segment, count });
        }

        let i = segment * 3;
        let rolls_tracked = self.has_rolls();
        self.points.drain(i + 1..i + 4);
        self.modes.remove(segment + 1);
        if rolls_tracked {
            self.rolls.remove(segment + 1);
        }

        if self.is_loop {
            self.close_seam();
        }
        self.enforce_mode(i);
        self.invalidate();
        Ok(())
    }

    fn close_seam(&mut self) {
        let len = self.points.len();
        self.points[len - 1] = self.points[0];
        let last = self.modes.len() - 1;
        self.modes[last] = self.modes[0];
        if self.has_rolls() {
            self.rolls[last] = self.rolls[0];
        }
        self.enforce_mode(0);
    }

    fn invalidate(&mut self) {
        self.cached_arc_length = 0.0;
        self.sample_points_t.clear();
        self.sampled_normals.clear();
    }
}

/// `B(t) = (1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3`
pub(crate) fn bezier_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

pub(crate) fn bezier_tangent(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let u = 1.0 - t;
    3.0 * u * u * (p1 - p0) + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
}
