//! Character core for an umbrella platformer: jump shaping, the umbrella
//! ability state machine, rope swing, rail hook, run and wind, hosted on
//! Bevy with avian2d physics.

pub mod content;
pub mod core;
pub mod mechanics;
pub mod movement;
