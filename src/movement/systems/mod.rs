//! Movement domain: system modules for sensing, input and controller drivers.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod movement;

pub(crate) use collisions::{detect_ground, detect_umbrella_tip, track_wind_zones};
pub(crate) use input::read_input;
pub(crate) use movement::{
    apply_character_commands, publish_character_events, run_decision_phase, run_physics_phase,
    update_presentation,
};
