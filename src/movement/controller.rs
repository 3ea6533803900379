//! Movement domain: the five-state movement controller.
//!
//! `PlayerController` owns every timer, flag and the rail walker. Each tick it
//! reads the host body, applies a queued rail acquisition, then runs the tick
//! hook of the active state. State changes only happen in `transition_to`,
//! which runs the outgoing exit hook before the incoming enter hook.

use bevy::prelude::*;

use crate::movement::host::{LocomotionHost, LocomotionSpeeds, WallHit, WallProbe, ZERO_GRAVITY};
use crate::movement::state::{MovementEvents, MovementState, MovementTimers};
use crate::movement::{MovementInput, MovementTuning};
use crate::track::{BezierTrack, TrackDirection, TrackWalker, angle_degrees, look_rotation, move_towards};

/// A rail touched by the detector, waiting for the next tick.
#[derive(Debug, Clone)]
pub struct GrindRequest {
    pub rail: Entity,
    pub track: BezierTrack,
    pub sample_index: usize,
}

/// Everything a hook may read or drive during one tick.
pub(crate) struct Frame<'a> {
    pub host: &'a mut dyn LocomotionHost,
    pub input: &'a MovementInput,
    pub tuning: &'a MovementTuning,
    pub dt: f32,
}

type Hook = fn(&mut PlayerController, &mut Frame<'_>);

pub(crate) struct StateHooks {
    pub enter: Hook,
    pub tick: Hook,
    pub exit: Hook,
}

impl MovementState {
    pub(crate) fn hooks(self) -> StateHooks {
        match self {
            MovementState::Grounded => StateHooks {
                enter: PlayerController::enter_grounded,
                tick: PlayerController::tick_grounded,
                exit: PlayerController::no_op,
            },
            MovementState::Aerial => StateHooks {
                enter: PlayerController::enter_aerial,
                tick: PlayerController::tick_aerial,
                exit: PlayerController::no_op,
            },
            MovementState::Wallride => StateHooks {
                enter: PlayerController::enter_wallride,
                tick: PlayerController::tick_wallride,
                exit: PlayerController::exit_wallride,
            },
            MovementState::Snapping => StateHooks {
                enter: PlayerController::enter_rail,
                tick: PlayerController::tick_snapping,
                exit: PlayerController::exit_snapping,
            },
            MovementState::Grinding => StateHooks {
                enter: PlayerController::enter_rail,
                tick: PlayerController::tick_grinding,
                exit: PlayerController::exit_grinding,
            },
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    state: MovementState,
    timers: MovementTimers,
    events: MovementEvents,
    walker: TrackWalker,
    pending_grind: Option<GrindRequest>,
    /// Rail whose sensors were switched off on acquisition
    claimed_rail: Option<Entity>,

    double_jumped: bool,
    input_turned: bool,
    acceleration_multiplier: f32,
    aerial_time: f32,
    wall_hit: Option<WallHit>,

    track_speed: f32,
    track_velocity: Vec3,

    // Body snapshot taken at the start of each tick
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,

    stuck_teleports: u32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            state: MovementState::Aerial,
            timers: MovementTimers::default(),
            events: MovementEvents::empty(),
            walker: TrackWalker::by_distance(),
            pending_grind: None,
            claimed_rail: None,
            // No double jump until the player has touched something
            double_jumped: true,
            input_turned: false,
            acceleration_multiplier: 0.0,
            aerial_time: 0.0,
            wall_hit: None,
            track_speed: 0.0,
            track_velocity: Vec3::NEG_Z,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            stuck_teleports: 0,
        }
    }
}

impl PlayerController {
    // -------------------------------------------------------------------------
    // Entry points
    // -------------------------------------------------------------------------

    /// Runs one simulation step. Ticks with no elapsed time only clear the event flags.
    pub fn tick(
        &mut self,
        host: &mut dyn LocomotionHost,
        input: &MovementInput,
        tuning: &MovementTuning,
        dt: f32,
    ) {
        self.events = MovementEvents::empty();
        if dt <= 0.0 {
            return;
        }

        self.capture(host);

        let mut frame = Frame {
            host,
            input,
            tuning,
            dt,
        };

        if let Some(request) = self.pending_grind.take() {
            if self.can_acquire(tuning) {
                self.acquire(&mut frame, request);
            } else {
                debug!(
                    "Dropping grind request for rail {:?}: no longer eligible",
                    request.rail
                );
            }
        }

        let tick = self.state.hooks().tick;
        tick(self, &mut frame);
    }

    /// Queues a rail acquisition for the start of the next tick.
    pub fn request_grind(&mut self, request: GrindRequest) {
        if let Some(previous) = &self.pending_grind {
            debug!(
                "Replacing pending grind on rail {:?} with rail {:?}",
                previous.rail, request.rail
            );
        }
        self.pending_grind = Some(request);
    }

    pub fn has_pending_grind(&self) -> bool {
        self.pending_grind.is_some()
    }

    /// Starts a grind immediately. Returns false when grinding is unavailable or
    /// the sample point does not exist.
    pub fn start_grind(
        &mut self,
        host: &mut dyn LocomotionHost,
        input: &MovementInput,
        tuning: &MovementTuning,
        request: GrindRequest,
    ) -> bool {
        self.capture(host);
        let mut frame = Frame {
            host,
            input,
            tuning,
            dt: 0.0,
        };
        self.acquire(&mut frame, request)
    }

    /// Overrides the state without running hooks. Unknown ids fall back to Aerial.
    pub fn force_state_id(&mut self, id: u8) -> MovementState {
        match MovementState::try_from(id) {
            Ok(state) => self.state = state,
            Err(id) => {
                error!("Movement state {} does not exist, resetting to aerial", id);
                self.state = MovementState::Aerial;
            }
        }
        self.state
    }

    /// Whether a rail touched right now could be grabbed.
    pub fn can_acquire(&self, tuning: &MovementTuning) -> bool {
        self.state == MovementState::Aerial
            && (!tuning.grinding_must_fall || self.is_falling())
            && !self.is_grind_on_cooldown()
    }

    // -------------------------------------------------------------------------
    // Telemetry
    // -------------------------------------------------------------------------

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn timers(&self) -> &MovementTimers {
        &self.timers
    }

    pub fn walker(&self) -> &TrackWalker {
        &self.walker
    }

    pub fn claimed_rail(&self) -> Option<Entity> {
        self.claimed_rail
    }

    pub fn double_jumped(&self) -> bool {
        self.double_jumped
    }

    pub fn acceleration_multiplier(&self) -> f32 {
        self.acceleration_multiplier
    }

    /// Body speed seen at the start of the last tick.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Speed relative to the maximum grind speed, in `[0, 1]`.
    pub fn scaled_speed(&self, tuning: &MovementTuning) -> f32 {
        let speed = self.speed();
        if speed <= 0.0 || tuning.grind_max_speed <= 0.0 {
            return 0.0;
        }
        (speed / tuning.grind_max_speed).clamp(0.0, 1.0)
    }

    pub fn grind_speed(&self) -> f32 {
        self.track_speed
    }

    /// Direction of travel along the rail.
    pub fn grind_orientation(&self) -> Quat {
        look_rotation(self.walker.direction.sign() * self.track_velocity, Vec3::Y)
    }

    pub fn events(&self) -> MovementEvents {
        self.events
    }

    pub fn event(&self, flag: MovementEvents) -> bool {
        self.events.contains(flag)
    }

    pub fn is_falling(&self) -> bool {
        self.velocity.y <= 0.0
    }

    pub fn is_grind_on_cooldown(&self) -> bool {
        self.timers.grind_cooldown > 0.0
    }

    pub fn wallride_point(&self) -> Option<Vec3> {
        self.wall_hit.map(|hit| hit.point)
    }

    pub fn wallride_orientation(&self) -> Option<Quat> {
        self.wall_hit.map(|hit| look_rotation(hit.normal, Vec3::Y))
    }

    /// How many times a grind had to teleport a stuck player.
    pub fn stuck_teleports(&self) -> u32 {
        self.stuck_teleports
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn capture(&mut self, host: &dyn LocomotionHost) {
        self.position = host.position();
        self.rotation = host.rotation();
        self.velocity = host.velocity();
    }

    fn transition_to(&mut self, frame: &mut Frame<'_>, next: MovementState) {
        let previous = self.state;
        (previous.hooks().exit)(self, frame);

        self.state = next;
        if !next.is_on_rail() {
            self.release_rail(frame.host);
            self.walker.unbind();
        }

        (next.hooks().enter)(self, frame);
        debug!("Movement state {} -> {}", previous, next);
    }

    fn release_rail(&mut self, host: &mut dyn LocomotionHost) {
        if let Some(rail) = self.claimed_rail.take() {
            host.set_rail_enabled(rail, true);
        }
    }

    fn acquire(&mut self, frame: &mut Frame<'_>, request: GrindRequest) -> bool {
        let tuning = frame.tuning;
        if !tuning.grinding_enabled || !frame.input.jump_bound {
            debug!("Ignoring rail {:?}: grinding unavailable", request.rail);
            return false;
        }

        let GrindRequest {
            rail,
            track,
            sample_index,
        } = request;
        let Some(distance) = track.sample_point_distance(sample_index) else {
            error!(
                "Rail {:?} has no usable sample point {}",
                rail, sample_index
            );
            return false;
        };

        // A second acquisition must not leave the first rail switched off
        self.release_rail(frame.host);

        self.walker.bind(rail, track);
        self.walker.position = distance;

        let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        self.track_speed = horizontal.length();
        let heading = if self.track_speed >= tuning.grind_momentum_threshold {
            horizontal
        } else {
            self.rotation * Vec3::NEG_Z
        };

        let rail_forward = self.walker.tangent();
        if rail_forward != Vec3::ZERO {
            self.track_velocity = rail_forward;
        }
        self.walker.direction = if angle_degrees(rail_forward, heading) >= 90.0 {
            TrackDirection::Backward
        } else {
            TrackDirection::Forward
        };

        if tuning.grinding_disables_rail {
            frame.host.set_rail_enabled(rail, false);
            self.claimed_rail = Some(rail);
        }

        info!(
            "Grinding rail {:?} from sample {} ({:.2}m), direction {:?}, speed {:.2}",
            rail, sample_index, distance, self.walker.direction, self.track_speed
        );
        self.transition_to(frame, MovementState::Snapping);
        true
    }

    // -------------------------------------------------------------------------
    // Shared helpers
    // -------------------------------------------------------------------------

    fn no_op(&mut self, _frame: &mut Frame<'_>) {}

    fn apply_base_locomotion(frame: &mut Frame<'_>) {
        frame.host.set_speeds(frame.tuning.base_speeds());
        frame.host.set_gravity_scale(frame.tuning.gravity_strength);
    }

    fn set_velocity(&mut self, frame: &mut Frame<'_>, velocity: Vec3) {
        frame.host.set_velocity(velocity);
        self.velocity = velocity;
    }

    /// Sweeps along the input direction and accepts walls facing the input by
    /// more than `min_angle` degrees.
    fn probe_wall(&self, frame: &Frame<'_>, min_angle: f32) -> Option<WallHit> {
        let tuning = frame.tuning;
        let local = frame.input.direction_3d();
        if local.length() < tuning.wall_ride_deadzone {
            return None;
        }

        let world = self.rotation * local;
        let direction = Dir3::new(world).ok()?;
        let hit = frame.host.cast_wall(&WallProbe {
            direction,
            radius: tuning.wall_detection_size,
            distance: tuning.wall_detection_distance,
            layers: tuning.wall_mask(),
        })?;

        let facing_wall = angle_degrees(world, hit.normal) > min_angle;
        let upright = hit.normal.y.abs() <= tuning.wall_ride_slope_tolerance;
        (facing_wall && upright).then_some(hit)
    }

    fn wall_jump_velocity(hit: &WallHit, tuning: &MovementTuning) -> Vec3 {
        let mut velocity = hit.normal * tuning.wall_jump_force;
        velocity.y = tuning.wall_jump_impulse;
        velocity
    }

    /// Jump off a rail while snapping or grinding.
    fn rail_jump(&mut self, frame: &mut Frame<'_>) {
        let tuning = frame.tuning;
        self.timers.grind_cooldown = tuning.grind_jump_cooldown;
        self.timers.bonus_jump = tuning.bonus_jump_time;
        self.timers.ledge_jump = 0.0;

        let mut velocity = self.velocity;
        velocity.y = tuning.grind_jump_impulse;
        self.set_velocity(frame, velocity);

        self.transition_to(frame, MovementState::Aerial);
    }

    // -------------------------------------------------------------------------
    // Grounded
    // -------------------------------------------------------------------------

    fn enter_grounded(&mut self, frame: &mut Frame<'_>) {
        let tuning = frame.tuning;
        Self::apply_base_locomotion(frame);

        self.timers.ledge_jump = tuning.ledge_jump_time;
        self.timers.bonus_jump = tuning.bonus_jump_time;
        self.timers.grind_cooldown = 0.0;
        self.timers.wall_jump_cooldown = 0.0;
        self.aerial_time = 0.0;

        if tuning.ground_resets_double_jump {
            self.double_jumped = false;
        }

        if tuning.acceleration_enabled {
            // Landing keeps whatever speed the player arrived with
            let speed = self.velocity.length();
            if speed > 0.0 {
                self.acceleration_multiplier =
                    (speed / tuning.run_speed).clamp(tuning.acceleration_minimum, 1.0);
            }
            frame
                .host
                .set_speeds(tuning.base_speeds().scaled(self.acceleration_multiplier));
        }
    }

    fn tick_grounded(&mut self, frame: &mut Frame<'_>) {
        let (tuning, dt) = (frame.tuning, frame.dt);

        // The grounded flag flickers on slopes, so require it to stay off
        if !frame.host.is_grounded() {
            self.aerial_time += dt;
            if self.aerial_time >= tuning.ground_debounce_time {
                self.transition_to(frame, MovementState::Aerial);
            }
            return;
        }
        self.aerial_time = 0.0;

        // The host performs the ground jump; it uses up the coyote window
        if frame.input.jump_pressed {
            self.timers.ledge_jump = 0.0;
        }

        if tuning.acceleration_enabled {
            let magnitude = frame.input.direction_3d().length();
            let (target, rate) = if magnitude > 0.0 {
                (1.0, tuning.acceleration_rate * magnitude)
            } else {
                (tuning.acceleration_minimum, tuning.acceleration_loss_rate)
            };
            self.acceleration_multiplier =
                move_towards(self.acceleration_multiplier, target, rate * dt);
            frame
                .host
                .set_speeds(tuning.base_speeds().scaled(self.acceleration_multiplier));
        }
    }

    // -------------------------------------------------------------------------
    // Aerial
    // -------------------------------------------------------------------------

    fn enter_aerial(&mut self, frame: &mut Frame<'_>) {
        Self::apply_base_locomotion(frame);
    }

    fn tick_aerial(&mut self, frame: &mut Frame<'_>) {
        let (tuning, input, dt) = (frame.tuning, frame.input, frame.dt);

        self.timers.tick_grind_cooldown(dt);
        self.timers.tick_wall_jump_cooldown(dt);

        if frame.host.is_grounded() {
            self.transition_to(frame, MovementState::Grounded);
            return;
        }

        if tuning.uses_walls()
            && let Some(hit) = self.probe_wall(frame, tuning.wall_ride_acquire_angle)
        {
            self.wall_hit = Some(hit);
            self.timers.wall_jump_window = tuning.wall_jump_time;
            if tuning.wall_ride_enabled {
                self.transition_to(frame, MovementState::Wallride);
                return;
            }
        }
        self.timers.tick_wall_jump_window(dt);

        let mut velocity = self.velocity;
        let mut changed = false;
        // One jump edge triggers at most one kind of jump
        let mut jump_used = false;

        if input.jump_pressed
            && self.timers.wall_jump_window > 0.0
            && self.timers.wall_jump_cooldown <= 0.0
            && let Some(hit) = self.wall_hit
        {
            velocity = Self::wall_jump_velocity(&hit, tuning);
            self.timers.bonus_jump = tuning.bonus_jump_time;
            self.timers.ledge_jump = 0.0;
            self.timers.wall_jump_window = 0.0;
            self.timers.wall_jump_cooldown = tuning.wall_jump_cooldown;
            if tuning.wall_resets_double_jump {
                self.double_jumped = false;
            }
            self.events |= MovementEvents::WALL_JUMPED;
            changed = true;
            jump_used = true;
        }

        if self.timers.ledge_jump > 0.0 {
            self.timers.tick_ledge_jump(dt);
            if input.jump_pressed && !jump_used {
                velocity.y = tuning.jump_impulse;
                self.timers.bonus_jump = tuning.bonus_jump_time;
                self.timers.ledge_jump = 0.0;
                changed = true;
                jump_used = true;
            }
        }

        if input.jump_held && self.timers.bonus_jump > 0.0 {
            velocity.y = tuning.jump_impulse;
            self.timers.tick_bonus_jump(dt);
            changed = true;
        } else {
            self.timers.bonus_jump = 0.0;
        }

        if input.jump_pressed
            && !jump_used
            && self.timers.bonus_jump <= 0.0
            && tuning.double_jump_enabled
            && !self.double_jumped
        {
            velocity.y = tuning.double_jump_impulse;
            self.timers.bonus_jump = tuning.bonus_jump_time;
            self.double_jumped = true;
            self.events |= MovementEvents::DOUBLE_JUMPED;
            changed = true;
        }

        if changed {
            self.set_velocity(frame, velocity);
        }
    }

    // -------------------------------------------------------------------------
    // Wallride
    // -------------------------------------------------------------------------

    fn enter_wallride(&mut self, frame: &mut Frame<'_>) {
        Self::apply_base_locomotion(frame);
        self.timers.ledge_jump = 0.0;
        self.timers.grind_cooldown = 0.0;
    }

    fn tick_wallride(&mut self, frame: &mut Frame<'_>) {
        let (tuning, dt) = (frame.tuning, frame.dt);
        self.timers.tick_wall_jump_cooldown(dt);

        if frame.host.is_grounded() {
            self.transition_to(frame, MovementState::Grounded);
            return;
        }

        let Some(hit) = self.probe_wall(frame, tuning.wall_ride_maintain_angle) else {
            self.transition_to(frame, MovementState::Aerial);
            return;
        };
        self.wall_hit = Some(hit);

        if frame.input.jump_pressed && self.timers.wall_jump_cooldown <= 0.0 {
            let velocity = Self::wall_jump_velocity(&hit, tuning);
            self.timers.bonus_jump = tuning.bonus_jump_time;
            self.timers.ledge_jump = 0.0;
            self.timers.wall_jump_cooldown = tuning.wall_jump_cooldown;
            self.set_velocity(frame, velocity);
            self.events |= MovementEvents::WALL_JUMPED;
            self.transition_to(frame, MovementState::Aerial);
        } else {
            let mut velocity = self.velocity;
            velocity.y = move_towards(
                velocity.y,
                -tuning.wall_ride_fall_speed,
                tuning.wall_ride_friction * dt,
            );
            self.set_velocity(frame, velocity);
        }
    }

    fn exit_wallride(&mut self, frame: &mut Frame<'_>) {
        self.timers.wall_jump_window = frame.tuning.wall_jump_time;
        if frame.tuning.wall_resets_double_jump {
            self.double_jumped = false;
        }
    }

    // -------------------------------------------------------------------------
    // Snapping and grinding
    // -------------------------------------------------------------------------

    fn enter_rail(&mut self, frame: &mut Frame<'_>) {
        let tuning = frame.tuning;
        frame.host.set_speeds(LocomotionSpeeds::ZERO);
        frame.host.set_gravity_scale(ZERO_GRAVITY);

        // Leaving a rail also gets coyote time
        self.timers.ledge_jump = tuning.ledge_jump_time;
        self.timers.bonus_jump = tuning.bonus_jump_time;

        if tuning.grinding_resets_double_jump {
            self.double_jumped = false;
        }
    }

    fn tick_snapping(&mut self, frame: &mut Frame<'_>) {
        let (tuning, dt) = (frame.tuning, frame.dt);

        if frame.input.jump_pressed {
            self.rail_jump(frame);
            return;
        }
        if !self.walker.is_bound() {
            error!("Snapping without a rail, dropping to aerial");
            self.transition_to(frame, MovementState::Aerial);
            return;
        }

        let target = self.walker.point();
        if self.position.distance(target) <= tuning.track_snap_epsilon {
            self.transition_to(frame, MovementState::Grinding);
            return;
        }

        let next = self
            .position
            .lerp(target, (tuning.track_snap_speed * dt).clamp(0.0, 1.0));
        self.set_velocity(frame, (next - self.position) / dt);
    }

    fn exit_snapping(&mut self, _frame: &mut Frame<'_>) {
        self.events |= MovementEvents::GRIND_STARTED;
        self.timers.grind_turn_cooldown = 0.0;
    }

    fn tick_grinding(&mut self, frame: &mut Frame<'_>) {
        let (tuning, input, dt) = (frame.tuning, frame.input, frame.dt);

        if input.jump_pressed {
            self.rail_jump(frame);
            return;
        }
        if !self.walker.is_bound() {
            error!("Grinding without a rail, dropping to aerial");
            self.transition_to(frame, MovementState::Aerial);
            return;
        }

        let tangent = self.walker.tangent();
        if tangent != Vec3::ZERO {
            self.track_velocity = tangent;
        }
        self.timers.tick_grind_turn_cooldown(dt);

        let local = input.direction_3d();
        let magnitude = local.length();
        let world = self.rotation * local;
        let heading = self.walker.direction.sign() * self.track_velocity;
        let full_speed = move_towards(
            self.track_speed,
            tuning.grind_max_speed,
            tuning.grind_acceleration * dt,
        );

        if angle_degrees(world, heading) > tuning.grind_turn_angle {
            if magnitude >= tuning.grind_slow_deadzone && magnitude <= tuning.grind_turn_deadzone {
                self.track_speed = move_towards(
                    self.track_speed,
                    tuning.grind_brake_speed,
                    tuning.grind_acceleration * dt,
                );
            } else if magnitude > tuning.grind_turn_deadzone {
                let mut speed = full_speed;
                if !self.input_turned && self.timers.grind_turn_cooldown <= 0.0 {
                    self.walker.reverse();
                    self.timers.grind_turn_cooldown = tuning.grind_turn_cooldown;
                    self.events |= MovementEvents::GRIND_STOPPED;
                    debug!("Grind reversed to {:?}", self.walker.direction);
                    speed = move_towards(0.0, tuning.grind_max_speed, tuning.grind_acceleration * dt);
                }
                self.input_turned = true;
                self.track_speed = speed;
            } else {
                self.input_turned = false;
                self.track_speed = full_speed;
            }
        } else {
            self.input_turned = false;
            self.track_speed = full_speed;
        }

        let Some(next) = self.walker.advance_by_distance(self.track_speed, dt) else {
            self.transition_to(frame, MovementState::Aerial);
            return;
        };

        if self.walker.is_finished() {
            // Fell off the end: keep momentum, briefly block re-acquisition
            self.timers.grind_cooldown = tuning.grind_fall_cooldown;
            self.events |= MovementEvents::GRIND_STOPPED;
            self.transition_to(frame, MovementState::Aerial);
            return;
        }

        let gap = next - frame.host.position();
        if gap.length() <= tuning.grind_teleport_distance {
            self.set_velocity(frame, (next - self.position) / dt);
        } else {
            self.stuck_teleports += 1;
            warn!(
                "Player stuck {:.2}m from rail, teleporting (count {})",
                gap.length(),
                self.stuck_teleports
            );
            frame.host.teleport(next, self.rotation);
        }
    }

    fn exit_grinding(&mut self, _frame: &mut Frame<'_>) {
        self.events |= MovementEvents::GRIND_STOPPED;
        self.timers.grind_turn_cooldown = 0.0;
    }
}
