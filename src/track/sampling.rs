//! Track domain: arc-length caching, collision sample points and sampled normals.

use bevy::prelude::*;

use super::curve::{BezierTrack, TrackError};

/// Polyline resolution used to measure the curve.
pub const ARC_LENGTH_SAMPLES: usize = 2000;

/// Number of up vectors transported along the curve by `prepare`.
pub const DEFAULT_NORMAL_SAMPLES: usize = 64;

impl BezierTrack {
    /// Measures the curve by summing a fine polyline. Returns the cached length.
    pub fn cache_arc_length(&mut self) -> f32 {
        let mut length = 0.0;
        let mut previous = self.point_at(0.0);
        for i in 1..=ARC_LENGTH_SAMPLES {
            let point = self.point_at(i as f32 / ARC_LENGTH_SAMPLES as f32);
            length += previous.distance(point);
            previous = point;
        }
        self.cached_arc_length = length;
        length
    }

    /// Places collision sample points roughly `spacing` apart along the curve.
    ///
    /// Each step is corrected by the ratio between the requested spacing and the
    /// chord it actually produced, the same way a walker keeps a constant speed.
    pub fn generate_sample_points(&mut self, spacing: f32) -> Result<usize, TrackError> {
        if spacing <= 0.0 || !spacing.is_finite() {
            return Err(TrackError::InvalidSpacing(spacing));
        }
        if !self.is_cached() {
            return Err(TrackError::MissingArcLength);
        }

        let length = self.cached_arc_length;
        let count = (length / spacing).round() as usize + 1;
        let mut samples = Vec::with_capacity(count);
        let mut position = 0.0;

        for _ in 0..count {
            if position > length + spacing * 0.5 {
                break;
            }
            samples.push((position / length).min(1.0));

            let chord = self
                .point_by_distance(position)
                .distance(self.point_by_distance(position + spacing));
            let multiplier = if chord > f32::EPSILON {
                spacing / chord
            } else {
                1.0
            };
            position += spacing * multiplier;
        }

        self.sample_points_t = samples;
        Ok(self.sample_points_t.len())
    }

    /// Transports an up vector along the curve with minimal twist.
    pub fn cache_normals(&mut self, count: usize) {
        self.sampled_normals.clear();
        if count < 2 {
            return;
        }

        let first_tangent = self.direction_at(0.0);
        let mut up = Vec3::Y - first_tangent * Vec3::Y.dot(first_tangent);
        if up.length_squared() < 1e-6 {
            up = Vec3::X - first_tangent * Vec3::X.dot(first_tangent);
        }
        let mut up = up.normalize_or_zero();
        let mut previous_tangent = first_tangent;
        self.sampled_normals.push(up);

        for i in 1..count {
            let t = i as f32 / (count - 1) as f32;
            let tangent = self.direction_at(t);
            if previous_tangent != Vec3::ZERO && tangent != Vec3::ZERO {
                up = (Quat::from_rotation_arc(previous_tangent, tangent) * up).normalize_or_zero();
                previous_tangent = tangent;
            }
            self.sampled_normals.push(up);
        }
    }

    /// Caches everything a rail needs before it can be walked or touched.
    pub fn prepare(&mut self, spacing: f32) -> Result<f32, TrackError> {
        let length = self.cache_arc_length();
        if length <= 0.0 {
            return Err(TrackError::MissingArcLength);
        }
        self.cache_normals(DEFAULT_NORMAL_SAMPLES);
        self.generate_sample_points(spacing)?;
        Ok(length)
    }

    pub fn sample_points(&self) -> &[f32] {
        &self.sample_points_t
    }

    pub fn sample_point_count(&self) -> usize {
        self.sample_points_t.len()
    }

    pub fn sample_point_t(&self, index: usize) -> Option<f32> {
        self.sample_points_t.get(index).copied()
    }

    pub fn sample_point_distance(&self, index: usize) -> Option<f32> {
        let t = self.sample_point_t(index)?;
        self.distance_at(t).ok()
    }

    pub fn sampled_normals(&self) -> &[Vec3] {
        &self.sampled_normals
    }

    /// Restores data authored offline. Fails when the stored values cannot be valid.
    pub fn restore_cache(
        &mut self,
        arc_length: f32,
        sample_points_t: Vec<f32>,
    ) -> Result<(), TrackError> {
        if arc_length <= 0.0 || !arc_length.is_finite() {
            return Err(TrackError::MissingArcLength);
        }
        self.cached_arc_length = arc_length;
        self.sample_points_t = sample_points_t;
        Ok(())
    }
}
