//! Movement domain: system modules for locomotion updates.

pub(crate) mod collisions;
pub(crate) mod controller;
pub(crate) mod detector;
pub(crate) mod input;
pub(crate) mod locomotion;

pub(crate) use collisions::{detect_ground, track_rail_contacts};
pub(crate) use controller::tick_player_controllers;
pub(crate) use detector::detect_rail_contacts;
pub(crate) use input::read_input;
pub(crate) use locomotion::apply_locomotion;
