//! Data definitions for the RON content files.
//!
//! These structs mirror the structure in assets/data/*.ron and are used
//! for deserialization. Movement tuning deserializes straight into
//! `MovementTuning`; rails go through `TrackDef`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::track::{BezierTrack, ControlPointMode, DEFAULT_NORMAL_SAMPLES, TrackError};

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Rails (tracks.ron)
// ============================================================================

fn default_sample_spacing() -> f32 {
    0.5
}

fn default_sample_radius() -> f32 {
    0.35
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrackDef {
    pub id: String,
    /// World-space control points, `3n + 1` of them
    pub points: Vec<Vec3>,
    /// One per segment boundary. Empty means all `Free`.
    #[serde(default)]
    pub modes: Vec<ControlPointMode>,
    /// Roll in degrees per segment boundary. Empty means no roll.
    #[serde(default)]
    pub rolls: Vec<f32>,
    #[serde(default)]
    pub is_loop: bool,
    #[serde(default = "default_sample_spacing")]
    pub sample_spacing: f32,
    #[serde(default = "default_sample_radius")]
    pub sample_radius: f32,
    /// Baked arc length. Used together with `sample_points_t` to skip sampling.
    #[serde(default)]
    pub cached_arc_length: Option<f32>,
    #[serde(default)]
    pub sample_points_t: Option<Vec<f32>>,
}

impl TrackDef {
    pub fn boundary_count(&self) -> usize {
        self.points.len().saturating_sub(1) / 3 + 1
    }

    /// Builds the runtime track, restoring baked sample data when both halves are present.
    pub fn build(&self) -> Result<BezierTrack, TrackError> {
        let modes = if self.modes.is_empty() {
            vec![ControlPointMode::Free; self.boundary_count()]
        } else {
            self.modes.clone()
        };
        let rolls = if self.rolls.is_empty() {
            vec![0.0; self.boundary_count()]
        } else {
            self.rolls.clone()
        };

        let mut track = BezierTrack::from_points(self.points.clone(), modes, rolls, self.is_loop)?;

        match (self.cached_arc_length, &self.sample_points_t) {
            (Some(arc_length), Some(samples)) => {
                track.restore_cache(arc_length, samples.clone())?;
                track.cache_normals(DEFAULT_NORMAL_SAMPLES);
            }
            _ => {
                track.prepare(self.sample_spacing)?;
            }
        }
        Ok(track)
    }
}
