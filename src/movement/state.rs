//! Movement domain: the movement state enum, countdown timers and per-tick event flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementState {
    Grounded,
    #[default]
    Aerial,
    Wallride,
    Snapping,
    Grinding,
}

impl MovementState {
    pub const ALL: [MovementState; 5] = [
        MovementState::Grounded,
        MovementState::Aerial,
        MovementState::Wallride,
        MovementState::Snapping,
        MovementState::Grinding,
    ];

    /// Stable id shared with replicas.
    pub fn id(self) -> u8 {
        match self {
            MovementState::Grounded => 0,
            MovementState::Aerial => 1,
            MovementState::Wallride => 2,
            MovementState::Snapping => 3,
            MovementState::Grinding => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MovementState::Grounded => "grounded",
            MovementState::Aerial => "aerial",
            MovementState::Wallride => "wallride",
            MovementState::Snapping => "snapping",
            MovementState::Grinding => "grinding",
        }
    }

    /// True while the walker drives the player along a rail.
    pub fn is_on_rail(self) -> bool {
        matches!(self, MovementState::Snapping | MovementState::Grinding)
    }
}

impl TryFrom<u8> for MovementState {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        MovementState::ALL
            .into_iter()
            .find(|state| state.id() == id)
            .ok_or(id)
    }
}

impl std::fmt::Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Countdowns in seconds. Each one is armed by a single state and never drops below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementTimers {
    /// Coyote time after leaving a ledge or rail
    pub ledge_jump: f32,
    /// Window in which holding jump keeps lifting
    pub bonus_jump: f32,
    /// Grace period for a wall jump after touching a wall
    pub wall_jump_window: f32,
    pub wall_jump_cooldown: f32,
    /// Blocks rail acquisition after leaving a rail
    pub grind_cooldown: f32,
    pub grind_turn_cooldown: f32,
}

impl MovementTimers {
    pub fn countdown(timer: &mut f32, dt: f32) {
        if *timer > 0.0 {
            *timer = (*timer - dt).max(0.0);
        }
    }

    pub fn tick_grind_cooldown(&mut self, dt: f32) {
        Self::countdown(&mut self.grind_cooldown, dt);
    }

    pub fn tick_wall_jump_cooldown(&mut self, dt: f32) {
        Self::countdown(&mut self.wall_jump_cooldown, dt);
    }

    pub fn tick_wall_jump_window(&mut self, dt: f32) {
        Self::countdown(&mut self.wall_jump_window, dt);
    }

    pub fn tick_ledge_jump(&mut self, dt: f32) {
        Self::countdown(&mut self.ledge_jump, dt);
    }

    pub fn tick_bonus_jump(&mut self, dt: f32) {
        Self::countdown(&mut self.bonus_jump, dt);
    }

    pub fn tick_grind_turn_cooldown(&mut self, dt: f32) {
        Self::countdown(&mut self.grind_turn_cooldown, dt);
    }
}

bitflags! {
    /// Things that happened during the current tick, cleared when the next one starts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementEvents: u8 {
        const DOUBLE_JUMPED = 1 << 1;
        const WALL_JUMPED = 1 << 2;
        const GRIND_STARTED = 1 << 3;
        const GRIND_STOPPED = 1 << 4;
    }
}
