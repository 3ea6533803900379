//! Validation for rail definitions and movement tuning.

use std::collections::HashSet;

use super::data::*;
use crate::movement::MovementTuning;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub source_type: &'static str,
    pub source_id: String,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' has invalid field '{}': {}",
            self.source_type, self.source_id, self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Helper macro for recording a failed check
macro_rules! check {
    ($errors:expr, $ok:expr, $source_type:expr, $source_id:expr, $field:expr, $($message:tt)+) => {
        if !$ok {
            $errors.push(ValidationError {
                source_type: $source_type,
                source_id: $source_id.to_string(),
                field: $field,
                message: format!($($message)+),
            });
        }
    };
}

/// Validate every rail definition.
/// Returns a list of validation errors, empty if all rails are usable.
pub fn validate_tracks(tracks: &[TrackDef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for track in tracks {
        let id = &track.id;
        check!(errors, !id.is_empty(), "Track", id, "id", "must not be empty");
        check!(errors, seen.insert(id.clone()), "Track", id, "id", "is used twice");

        let count = track.points.len();
        check!(
            errors,
            count >= 4 && (count - 1) % 3 == 0,
            "Track",
            id,
            "points",
            "expected 3n + 1 control points (n >= 1), found {}",
            count
        );
        check!(
            errors,
            track.modes.is_empty() || track.modes.len() == track.boundary_count(),
            "Track",
            id,
            "modes",
            "expected {} modes, found {}",
            track.boundary_count(),
            track.modes.len()
        );
        check!(
            errors,
            track.sample_spacing > 0.0,
            "Track",
            id,
            "sample_spacing",
            "must be positive, found {}",
            track.sample_spacing
        );
        check!(
            errors,
            track.sample_radius > 0.0,
            "Track",
            id,
            "sample_radius",
            "must be positive, found {}",
            track.sample_radius
        );

        match (&track.cached_arc_length, &track.sample_points_t) {
            (Some(length), Some(samples)) => {
                check!(
                    errors,
                    *length > 0.0,
                    "Track",
                    id,
                    "cached_arc_length",
                    "must be positive, found {}",
                    length
                );
                check!(
                    errors,
                    samples.iter().all(|t| (0.0..=1.0).contains(t)),
                    "Track",
                    id,
                    "sample_points_t",
                    "values must lie in [0, 1]"
                );
            }
            (None, None) => {}
            _ => check!(
                errors,
                false,
                "Track",
                id,
                "cached_arc_length",
                "cached_arc_length and sample_points_t must be given together"
            ),
        }
    }

    errors
}

/// Sanity checks on movement tuning that would otherwise fail silently in play.
pub fn validate_tuning(tuning: &MovementTuning) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let id = "movement";

    check!(
        errors,
        tuning.run_speed > 0.0,
        "Tuning",
        id,
        "run_speed",
        "must be positive, found {}",
        tuning.run_speed
    );
    check!(
        errors,
        tuning.ground_debounce_time >= 0.0,
        "Tuning",
        id,
        "ground_debounce_time",
        "must not be negative"
    );
    check!(
        errors,
        (0.0..=1.0).contains(&tuning.acceleration_minimum),
        "Tuning",
        id,
        "acceleration_minimum",
        "must lie in [0, 1], found {}",
        tuning.acceleration_minimum
    );
    check!(
        errors,
        tuning.grind_slow_deadzone <= tuning.grind_turn_deadzone,
        "Tuning",
        id,
        "grind_slow_deadzone",
        "must not exceed grind_turn_deadzone ({} > {})",
        tuning.grind_slow_deadzone,
        tuning.grind_turn_deadzone
    );
    check!(
        errors,
        tuning.grind_max_speed > 0.0,
        "Tuning",
        id,
        "grind_max_speed",
        "must be positive, found {}",
        tuning.grind_max_speed
    );
    check!(
        errors,
        tuning.track_snap_speed > 0.0,
        "Tuning",
        id,
        "track_snap_speed",
        "must be positive, found {}",
        tuning.track_snap_speed
    );
    check!(
        errors,
        !tuning.uses_walls() || !tuning.wall_layers.is_empty(),
        "Tuning",
        id,
        "wall_layers",
        "wall riding or jumping is enabled but no wall layer is set"
    );

    errors
}
