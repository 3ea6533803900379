//! Track domain: tests for curve evaluation, authoring edits, sampling and walking.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    BezierTrack, ControlPointMode, TrackDirection, TrackError, TrackWalker, angle_degrees,
    look_rotation, move_towards,
};

fn straight_track() -> BezierTrack {
    BezierTrack::from_points(
        vec![
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(9.0, 0.0, 0.0),
        ],
        vec![ControlPointMode::Free; 2],
        vec![0.0; 2],
        false,
    )
    .unwrap()
}

fn curved_track() -> BezierTrack {
    BezierTrack::from_points(
        vec![
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 8.0),
            Vec3::new(8.0, 0.0, 8.0),
            Vec3::new(8.0, 0.0, 0.0),
        ],
        vec![ControlPointMode::Free; 2],
        vec![0.0; 2],
        false,
    )
    .unwrap()
}

fn two_segment_track() -> BezierTrack {
    BezierTrack::from_points(
        vec![
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(3.0, 2.0, 1.0),
            Vec3::new(4.0, 2.0, 2.0),
            Vec3::new(5.0, 2.0, 3.0),
            Vec3::new(7.0, 0.0, 3.0),
            Vec3::new(8.0, 0.0, 0.0),
        ],
        vec![
            ControlPointMode::Free,
            ControlPointMode::Mirrored,
            ControlPointMode::Free,
        ],
        vec![0.0; 3],
        false,
    )
    .unwrap()
}

fn loop_track() -> BezierTrack {
    BezierTrack::from_points(
        vec![
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(10.0, 0.0, 5.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::ZERO,
        ],
        vec![ControlPointMode::Mirrored; 3],
        vec![0.0; 3],
        true,
    )
    .unwrap()
}

fn close(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    a.distance(b) <= tolerance
}

// -----------------------------------------------------------------------------
// Construction tests
// -----------------------------------------------------------------------------

#[test]
fn test_default_track_is_reset_curve() {
    let track = BezierTrack::default();
    assert_eq!(track.control_point_count(), 4);
    assert_eq!(track.control_point(0), Some(Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(track.control_point(3), Some(Vec3::new(4.0, 0.0, 0.0)));
    assert_eq!(track.modes(), &[ControlPointMode::Free; 2]);
    assert!(!track.is_loop());
    assert!(!track.is_cached());
}

#[test]
fn test_from_points_rejects_bad_point_counts() {
    let result = BezierTrack::from_points(
        vec![Vec3::ZERO; 5],
        vec![ControlPointMode::Free; 2],
        vec![],
        false,
    );
    assert_eq!(result, Err(TrackError::InvalidPointCount(5)));

    let result = BezierTrack::from_points(vec![Vec3::ZERO; 1], vec![], vec![], false);
    assert_eq!(result, Err(TrackError::InvalidPointCount(1)));
}

#[test]
fn test_from_points_rejects_mode_mismatch() {
    let result = BezierTrack::from_points(
        vec![Vec3::ZERO; 7],
        vec![ControlPointMode::Free; 2],
        vec![],
        false,
    );
    assert_eq!(
        result,
        Err(TrackError::ModeCountMismatch {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn test_loop_keeps_seam_identical() {
    let track = loop_track();
    let last = track.control_point_count() - 1;
    assert_eq!(track.control_point(0), track.control_point(last));
    assert_eq!(track.modes()[0], track.modes()[2]);
    assert_eq!(track.rolls()[0], track.rolls()[2]);
}

// -----------------------------------------------------------------------------
// Evaluation tests
// -----------------------------------------------------------------------------

#[test]
fn test_segment_indexing() {
    let track = two_segment_track();
    assert_eq!(track.segment_count(), 2);
    assert_eq!(track.segment_index(0.0), 0);
    assert_eq!(track.segment_index(0.49), 0);
    assert_eq!(track.segment_index(0.5), 3);
    assert_eq!(track.segment_index(1.0), 3);
    assert!((track.segment_value(0.25) - 0.5).abs() < 1e-5);
    assert_eq!(track.segment_value(1.0), 1.0);
    assert_eq!(track.segment_value(2.0), 1.0);
}

#[test]
fn test_endpoints_and_clamping() {
    let track = two_segment_track();
    assert!(close(track.point_at(0.0), Vec3::ZERO, 1e-5));
    assert!(close(track.point_at(1.0), Vec3::new(8.0, 0.0, 0.0), 1e-5));
    assert!(close(track.point_at(-1.0), track.point_at(0.0), 1e-5));
    assert!(close(track.point_at(3.0), track.point_at(1.0), 1e-5));
}

#[test]
fn test_point_and_tangent_continuous_at_boundary() {
    let track = two_segment_track();
    let before = 0.5 - 1e-4;
    let after = 0.5 + 1e-4;

    assert!(close(track.point_at(before), track.point_at(after), 1e-2));
    assert!(close(track.point_at(0.5), Vec3::new(4.0, 2.0, 2.0), 1e-5));
    assert!(close(track.tangent_at(before), track.tangent_at(after), 1e-1));
}

#[test]
fn test_straight_track_frame() {
    let mut track = straight_track();
    track.prepare(1.0).unwrap();

    assert!(close(track.direction_at(0.5), Vec3::X, 1e-4));
    assert!(close(track.normal_at(0.5), Vec3::Y, 1e-4));

    let orientation = track.orientation_at(0.5);
    assert!(close(orientation * Vec3::NEG_Z, Vec3::X, 1e-3));
    assert!(close(orientation * Vec3::Y, Vec3::Y, 1e-3));
}

#[test]
fn test_roll_twists_orientation() {
    let mut track = straight_track();
    track.set_control_point_roll(0, 90.0);
    track.set_control_point_roll(3, 90.0);

    assert!((track.roll_at(0.5) - 90.0).abs() < 1e-4);
    let orientation = track.orientation_at(0.5);
    assert!(close(orientation * Vec3::NEG_Z, Vec3::X, 1e-3));
    assert!(close(orientation * Vec3::Y, Vec3::NEG_Z, 1e-3));
}

#[test]
fn test_roll_blends_between_boundaries() {
    let mut track = straight_track();
    track.set_control_point_roll(3, 40.0);
    assert!((track.roll_at(0.25) - 10.0).abs() < 1e-3);

    // Handles report the roll of the boundary they belong to
    assert_eq!(track.control_point_roll(1), 0.0);
    assert_eq!(track.control_point_roll(2), 40.0);
}

#[test]
fn test_legacy_rolls_fall_back_to_tangent_orientation() {
    let track = BezierTrack::from_points(
        vec![
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(9.0, 0.0, 0.0),
        ],
        vec![ControlPointMode::Free; 2],
        vec![45.0],
        false,
    )
    .unwrap();

    assert!(!track.has_rolls());
    assert_eq!(track.roll_at(0.5), 0.0);
    assert!(close(track.orientation_at(0.5) * Vec3::Y, Vec3::Y, 1e-3));
}

#[test]
fn test_setting_roll_upgrades_legacy_rolls() {
    let mut track = BezierTrack::from_points(
        vec![
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(9.0, 0.0, 0.0),
        ],
        vec![ControlPointMode::Free; 2],
        vec![],
        false,
    )
    .unwrap();

    track.set_control_point_roll(3, 15.0);
    assert!(track.has_rolls());
    assert_eq!(track.rolls(), &[0.0, 15.0]);
}

// -----------------------------------------------------------------------------
// Distance tests
// -----------------------------------------------------------------------------

#[test]
fn test_distance_queries_require_cache() {
    let track = straight_track();
    assert_eq!(track.t_at_distance(1.0), Err(TrackError::MissingArcLength));
    assert_eq!(track.distance_at(0.5), Err(TrackError::MissingArcLength));
    assert_eq!(track.point_by_distance(1.0), Vec3::ZERO);
    assert_eq!(track.tangent_by_distance(1.0), Vec3::ZERO);
    assert_eq!(track.orientation_by_distance(1.0), Quat::IDENTITY);
}

#[test]
fn test_arc_length_of_straight_track() {
    let mut track = straight_track();
    let length = track.cache_arc_length();
    assert!((length - 9.0).abs() < 1e-3);
    assert!(track.is_cached());
}

#[test]
fn test_arc_length_caching_is_idempotent() {
    let mut track = curved_track();
    let first = track.cache_arc_length();
    let second = track.cache_arc_length();
    assert!((first - second).abs() < 1e-5);
    assert!(first > 8.0);
}

#[test]
fn test_distance_endpoints_match_parameter_endpoints() {
    let mut track = curved_track();
    let length = track.cache_arc_length();

    assert!(close(track.point_by_distance(0.0), track.point_at(0.0), 1e-4));
    assert!(close(track.point_by_distance(length), track.point_at(1.0), 1e-4));
}

#[test]
fn test_edits_invalidate_cache() {
    let mut track = curved_track();
    track.prepare(1.0).unwrap();
    assert!(track.sample_point_count() > 0);

    track.set_control_point(1, Vec3::new(0.0, 1.0, 8.0));
    assert!(!track.is_cached());
    assert_eq!(track.sample_point_count(), 0);
    assert!(track.sampled_normals().is_empty());
}

// -----------------------------------------------------------------------------
// Sampling tests
// -----------------------------------------------------------------------------

#[test]
fn test_sample_points_on_straight_track() {
    let mut track = straight_track();
    track.prepare(1.0).unwrap();

    assert_eq!(track.sample_point_count(), 10);
    assert_eq!(track.sample_point_t(0), Some(0.0));
    let last = track.sample_point_distance(9).unwrap();
    assert!((last - 9.0).abs() < 1e-2);
    assert_eq!(track.sample_point_t(10), None);
}

#[test]
fn test_sample_points_are_evenly_spaced_on_curves() {
    let mut track = curved_track();
    track.prepare(0.5).unwrap();

    let points: Vec<Vec3> = track
        .sample_points()
        .iter()
        .map(|&t| track.point_at(t))
        .collect();
    // The final sample is clamped to the end of the rail
    let interior = &points[..points.len() - 1];
    for pair in interior.windows(2) {
        let spacing = pair[0].distance(pair[1]);
        assert!((spacing - 0.5).abs() < 0.05, "spacing {}", spacing);
    }
}

#[test]
fn test_generate_sample_points_errors() {
    let mut track = straight_track();
    assert_eq!(
        track.generate_sample_points(1.0),
        Err(TrackError::MissingArcLength)
    );
    track.cache_arc_length();
    assert_eq!(
        track.generate_sample_points(0.0),
        Err(TrackError::InvalidSpacing(0.0))
    );
}

#[test]
fn test_sampled_normals_stay_up_on_flat_curve() {
    let mut track = curved_track();
    track.cache_normals(16);
    assert_eq!(track.sampled_normals().len(), 16);
    for normal in track.sampled_normals() {
        assert!(close(*normal, Vec3::Y, 1e-3));
    }
}

#[test]
fn test_restore_cache_rejects_zero_length() {
    let mut track = straight_track();
    assert_eq!(
        track.restore_cache(0.0, vec![0.0]),
        Err(TrackError::MissingArcLength)
    );
    track.restore_cache(9.0, vec![0.0, 0.5, 1.0]).unwrap();
    assert_eq!(track.sample_point_count(), 3);
    assert_eq!(track.sample_point_distance(1), Some(4.5));
}

// -----------------------------------------------------------------------------
// Continuity enforcement tests
// -----------------------------------------------------------------------------

fn random_point(rng: &mut ChaCha8Rng) -> Vec3 {
    Vec3::new(
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
    )
}

#[test]
fn test_mirrored_handles_are_exact_reflections() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..50 {
        let points: Vec<Vec3> = (0..7).map(|_| random_point(&mut rng)).collect();
        let mut track = BezierTrack::from_points(
            points,
            vec![ControlPointMode::Free; 3],
            vec![0.0; 3],
            false,
        )
        .unwrap();

        track.set_control_point_mode(3, ControlPointMode::Mirrored);
        let handle = if rng.random_bool(0.5) { 2 } else { 4 };
        track.set_control_point(handle, random_point(&mut rng));

        let center = track.control_point(3).unwrap();
        let before = track.control_point(2).unwrap() - center;
        let after = track.control_point(4).unwrap() - center;
        assert!((before.length() - after.length()).abs() < 1e-3);
        assert!(close(before, -after, 1e-3));
    }
}

#[test]
fn test_aligned_handles_keep_their_length() {
    let mut track = two_segment_track();
    track.set_control_point_mode(3, ControlPointMode::Free);
    track.set_control_point(4, Vec3::new(4.0, 2.0, 5.0));
    track.set_control_point_mode(3, ControlPointMode::Aligned);

    let length_after = track.control_point(4).unwrap().distance(Vec3::new(4.0, 2.0, 2.0));
    track.set_control_point(2, Vec3::new(4.0, 0.0, 2.0));

    let center = track.control_point(3).unwrap();
    let before = track.control_point(2).unwrap() - center;
    let after = track.control_point(4).unwrap() - center;
    assert!((after.length() - length_after).abs() < 1e-3);
    assert!(close(before.normalize(), -after.normalize(), 1e-3));
}

#[test]
fn test_free_mode_does_not_touch_handles() {
    let mut track = two_segment_track();
    track.set_control_point_mode(3, ControlPointMode::Free);
    let opposite = track.control_point(4);
    track.set_control_point(2, Vec3::new(-3.0, 0.0, 0.0));
    assert_eq!(track.control_point(4), opposite);
}

#[test]
fn test_moving_boundary_carries_handles() {
    let mut track = two_segment_track();
    let delta = Vec3::new(0.0, 1.0, 0.0);
    let before = (track.control_point(2).unwrap(), track.control_point(4).unwrap());

    track.set_control_point(3, track.control_point(3).unwrap() + delta);
    assert!(close(track.control_point(2).unwrap(), before.0 + delta, 1e-5));
    assert!(close(track.control_point(4).unwrap(), before.1 + delta, 1e-5));
}

#[test]
fn test_loop_seam_follows_edits() {
    let mut track = loop_track();
    let last = track.control_point_count() - 1;

    track.set_control_point(0, Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(track.control_point(0), track.control_point(last));

    track.set_control_point_mode(last, ControlPointMode::Aligned);
    assert_eq!(track.modes()[0], ControlPointMode::Aligned);

    track.set_control_point_roll(0, 30.0);
    assert_eq!(track.rolls()[2], 30.0);
}

#[test]
fn test_loop_seam_handles_are_mirrored() {
    let mut track = loop_track();
    let last = track.control_point_count() - 1;
    track.set_control_point(1, Vec3::new(2.0, 0.0, 4.0));

    let center = track.control_point(0).unwrap();
    let after = track.control_point(1).unwrap() - center;
    let before = track.control_point(last - 1).unwrap() - center;
    assert!(close(before, -after, 1e-4));
}

// -----------------------------------------------------------------------------
// Structural edit tests
// -----------------------------------------------------------------------------

#[test]
fn test_add_and_remove_curve() {
    let mut track = straight_track();
    track.cache_arc_length();
    track.add_curve();

    assert_eq!(track.control_point_count(), 7);
    assert_eq!(track.modes().len(), 3);
    assert_eq!(track.rolls().len(), 3);
    assert_eq!(track.control_point(6), Some(Vec3::new(12.0, 0.0, 0.0)));
    assert!(!track.is_cached());

    track.remove_curve().unwrap();
    assert_eq!(track.control_point_count(), 4);
    assert_eq!(track.remove_curve(), Err(TrackError::LastSegment));
}

#[test]
fn test_insert_curve_preserves_shape() {
    let original = curved_track();
    let mut track = original.clone();
    track.insert_curve_at(0).unwrap();

    assert_eq!(track.segment_count(), 2);
    assert_eq!(track.modes().len(), 3);
    assert_eq!(track.modes()[1], ControlPointMode::Aligned);
    assert_eq!(track.rolls().len(), 3);
    for t in [0.1, 0.25, 0.5, 0.75, 0.9] {
        assert!(close(track.point_at(t), original.point_at(t), 1e-4));
    }
}

#[test]
fn test_insert_curve_out_of_range() {
    let mut track = straight_track();
    assert_eq!(
        track.insert_curve_at(1),
        Err(TrackError::SegmentOutOfRange {
            segment: 1,
            count: 1
        })
    );
}

#[test]
fn test_remove_curve_at_keeps_invariants() {
    let mut track = two_segment_track();
    track.remove_curve_at(0).unwrap();

    assert_eq!(track.control_point_count(), 4);
    assert_eq!((track.control_point_count() - 1) % 3, 0);
    assert_eq!(track.modes().len(), 2);
    assert_eq!(track.rolls().len(), 2);
    assert_eq!(track.control_point(0), Some(Vec3::ZERO));
    assert_eq!(track.control_point(3), Some(Vec3::new(8.0, 0.0, 0.0)));
    assert_eq!(track.remove_curve_at(0), Err(TrackError::LastSegment));
}

#[test]
fn test_reset_restores_default() {
    let mut track = two_segment_track();
    track.reset();
    assert_eq!(track, BezierTrack::default());
}

// -----------------------------------------------------------------------------
// Walker tests
// -----------------------------------------------------------------------------

fn rail_entity() -> Entity {
    World::new().spawn_empty().id()
}

fn walked_distance(track: BezierTrack, speed: f32, dt: f32, ticks: usize) -> f32 {
    let mut walker = TrackWalker::by_distance();
    walker.bind(rail_entity(), track);

    let mut previous = walker.point();
    let mut total = 0.0;
    for _ in 0..ticks {
        let point = walker.advance_by_distance(speed, dt).unwrap();
        total += previous.distance(point);
        previous = point;
    }
    total
}

#[test]
fn test_bind_resets_cursor() {
    let mut walker = TrackWalker::default();
    walker.position = 3.0;
    walker.direction = TrackDirection::Backward;
    walker.bind(rail_entity(), straight_track());
    assert_eq!(walker.position, 0.0);
    assert_eq!(walker.direction, TrackDirection::Forward);
    assert!(walker.is_bound());
}

#[test]
fn test_by_distance_walker_starts_unbound() {
    let mut walker = TrackWalker::by_distance();
    assert!(walker.walk_by_distance);
    assert!(!walker.is_bound());

    walker.bind(rail_entity(), straight_track());
    assert!(walker.walk_by_distance);
    assert_eq!(walker.position, 0.0);
}

#[test]
fn test_walker_orientation_follows_the_rail() {
    let mut walker = TrackWalker::default();
    assert_eq!(walker.orientation(), Quat::IDENTITY);

    let mut track = straight_track();
    track.set_control_point_roll(0, 90.0);
    track.set_control_point_roll(3, 90.0);
    walker.bind(rail_entity(), track.clone());
    walker.position = 0.5;

    assert_eq!(walker.orientation(), track.orientation_at(0.5));
    assert!(close(walker.orientation() * Vec3::NEG_Z, Vec3::X, 1e-3));
}

#[test]
fn test_unbound_walker() {
    let mut walker = TrackWalker::default();
    assert!(walker.advance_by_distance(1.0, 0.1).is_none());
    assert!(walker.advance_by_time(1.0, 0.1).is_none());
    assert!(walker.is_finished());
    assert_eq!(walker.point(), Vec3::ZERO);
}

#[test]
fn test_constant_speed_independent_of_curvature() {
    let speed = 2.0;
    let dt = 1.0 / 60.0;
    let ticks = 120;
    let expected = speed * dt * ticks as f32;

    let mut straight = straight_track();
    straight.cache_arc_length();
    let mut curved = curved_track();
    curved.cache_arc_length();
    let mut clustered = BezierTrack::from_points(
        vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(9.0, 0.0, 0.0),
        ],
        vec![ControlPointMode::Free; 2],
        vec![0.0; 2],
        false,
    )
    .unwrap();
    clustered.cache_arc_length();

    let straight_total = walked_distance(straight, speed, dt, ticks);
    let curved_total = walked_distance(curved, speed, dt, ticks);
    let clustered_total = walked_distance(clustered, speed, dt, ticks);

    assert!((straight_total - expected).abs() / expected < 0.05);
    assert!((curved_total - expected).abs() / expected < 0.05);
    assert!((clustered_total - expected).abs() / expected < 0.05);
    assert!((straight_total - curved_total).abs() / expected < 0.05);
}

#[test]
fn test_walking_by_parameter_also_keeps_speed() {
    let mut track = curved_track();
    track.cache_arc_length();
    let mut walker = TrackWalker::default();
    walker.bind(rail_entity(), track);

    let mut previous = walker.point();
    let mut total = 0.0;
    for _ in 0..60 {
        let point = walker.advance_by_distance(3.0, 1.0 / 60.0).unwrap();
        total += previous.distance(point);
        previous = point;
    }
    assert!((total - 3.0).abs() / 3.0 < 0.05);
    assert!(walker.position < 1.0);
}

#[test]
fn test_looping_walker_wraps_in_both_directions() {
    let mut track = loop_track();
    let length = track.cache_arc_length();
    let mut walker = TrackWalker::by_distance();
    walker.bind(rail_entity(), track);

    for direction in [TrackDirection::Backward, TrackDirection::Forward] {
        walker.direction = direction;
        for _ in 0..600 {
            walker.advance_by_distance(8.0, 1.0 / 30.0).unwrap();
            assert!(walker.position >= 0.0 && walker.position < length);
            assert!(!walker.is_finished());
        }
    }
}

#[test]
fn test_looping_walker_by_time_wraps() {
    let mut walker = TrackWalker::default();
    walker.bind(rail_entity(), loop_track());
    walker.direction = TrackDirection::Backward;
    walker.advance_by_time(0.25, 1.0).unwrap();
    assert!((walker.position - 0.75).abs() < 1e-5);
}

#[test]
fn test_non_looping_walker_finishes_past_either_end() {
    let mut track = straight_track();
    let length = track.cache_arc_length();
    let mut walker = TrackWalker::by_distance();
    walker.bind(rail_entity(), track);

    walker.position = length;
    assert!(!walker.is_finished());
    walker.advance_by_distance(1.0, 0.1).unwrap();
    assert!(walker.is_finished());

    walker.position = 0.0;
    walker.direction = TrackDirection::Backward;
    assert!(!walker.is_finished());
    walker.advance_by_distance(1.0, 0.1).unwrap();
    assert!(walker.is_finished());
}

#[test]
fn test_walker_finishes_once_along_the_way() {
    let mut track = straight_track();
    track.cache_arc_length();
    let mut walker = TrackWalker::by_distance();
    walker.bind(rail_entity(), track);

    let mut finished_at = None;
    for tick in 0..200 {
        walker.advance_by_distance(6.0, 1.0 / 60.0).unwrap();
        if walker.is_finished() {
            finished_at = Some(tick);
            break;
        }
    }
    // 9 units at 0.1 per tick
    let tick = finished_at.unwrap();
    assert!((88..=92).contains(&tick), "finished at tick {}", tick);
    assert!(walker.position > walker.length());
}

#[test]
fn test_direction_helpers() {
    assert_eq!(TrackDirection::Forward.sign(), 1.0);
    assert_eq!(TrackDirection::Backward.sign(), -1.0);
    assert_eq!(TrackDirection::Forward.reversed(), TrackDirection::Backward);

    let mut walker = TrackWalker::default();
    walker.reverse();
    assert_eq!(walker.direction, TrackDirection::Backward);
}

// -----------------------------------------------------------------------------
// Frame helpers
// -----------------------------------------------------------------------------

#[test]
fn test_look_rotation_forward_maps_neg_z() {
    let rotation = look_rotation(Vec3::X, Vec3::Y);
    assert!(close(rotation * Vec3::NEG_Z, Vec3::X, 1e-3));
    assert!(close(rotation * Vec3::Y, Vec3::Y, 1e-3));
}

#[test]
fn test_look_rotation_degenerate() {
    assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);

    // Straight up still produces a usable rotation
    let rotation = look_rotation(Vec3::Y, Vec3::Y);
    assert!(close(rotation * Vec3::NEG_Z, Vec3::Y, 1e-3));
}

#[test]
fn test_angle_degrees() {
    assert!((angle_degrees(Vec3::X, Vec3::Z) - 90.0).abs() < 0.01);
    assert!((angle_degrees(Vec3::X, Vec3::NEG_X) - 180.0).abs() < 0.01);
    assert_eq!(angle_degrees(Vec3::ZERO, Vec3::X), 0.0);
}

#[test]
fn test_move_towards() {
    assert_eq!(move_towards(0.0, 5.0, 2.0), 2.0);
    assert_eq!(move_towards(4.0, 5.0, 2.0), 5.0);
    assert_eq!(move_towards(0.0, -1.0, 0.25), -0.25);
}
