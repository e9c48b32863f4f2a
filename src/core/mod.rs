//! Core domain: camera and the global movement gate.

mod resources;
mod systems;
#[cfg(test)]
mod tests;

pub use resources::{MovementLimiter, movement_allowed};

use bevy::prelude::*;

/// Ordering for the decision phase. Sensing runs before any ability
/// transition, which runs before presentation.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    Input,
    Sense,
    Decide,
    Publish,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementLimiter>()
            .configure_sets(
                Update,
                (
                    CharacterSet::Input,
                    CharacterSet::Sense,
                    CharacterSet::Decide,
                    CharacterSet::Publish,
                )
                    .chain(),
            )
            .add_systems(Startup, systems::setup_camera)
            .add_systems(
                Update,
                systems::tick_movement_limiter.before(CharacterSet::Input),
            );
    }
}
