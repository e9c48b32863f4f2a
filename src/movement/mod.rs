//! Movement domain: the umbrella character core and its ECS wiring.

mod bootstrap;
mod character;
mod components;
mod dash;
#[cfg(feature = "dev-tools")]
mod dev;
mod events;
mod ground;
mod hook;
mod horizontal;
mod input;
mod jump;
mod swing;
mod systems;
mod umbrella;
mod wind;

pub use bootstrap::PLAYER_SPAWN;
pub use character::{CharacterController, Surroundings};
pub use components::{
    AbilityTint, BodyState, CharacterBody, Facing, GameLayer, Ground, Player, Senses,
    SwingAnchor, Wall,
};
pub use dash::{DashPhase, DashState, DashStep, clamp_dash_velocity, dash_force_curve};
pub use events::{AnimationCue, CharacterCommand, CharacterEvent, CharacterEventKind, Cue, Outbox};
pub use ground::{Contact, GroundSensor};
pub use hook::{HookController, HookRail, RailPath, nearest_rail};
pub use horizontal::{MovementController, move_towards};
pub use input::{Button, InputSnapshot};
pub use jump::{Authority, FallModifiers, JumpController, JumpGrant, JumpKind};
pub use swing::{AnchorCandidate, AnchorProbe, NoProbe, ProbeHit, SwingController, aim_direction};
pub use umbrella::{AbilityState, DashOutcome, DashRequest, TransitionError, UmbrellaController};
pub use wind::{WindController, WindZone};

use bevy::prelude::*;

use crate::core::{CharacterSet, movement_allowed};
use crate::movement::bootstrap::spawn_player;
use crate::movement::systems::{
    apply_character_commands, detect_ground, detect_umbrella_tip, publish_character_events,
    read_input, run_decision_phase, run_physics_phase, track_wind_zones, update_presentation,
};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SwingAnchor>()
            .register_type::<HookRail>()
            .register_type::<WindZone>()
            .add_message::<CharacterEvent>()
            .add_message::<AnimationCue>()
            .add_message::<CharacterCommand>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                read_input
                    .run_if(movement_allowed)
                    .in_set(CharacterSet::Input),
            )
            .add_systems(
                Update,
                (detect_ground, detect_umbrella_tip, track_wind_zones).in_set(CharacterSet::Sense),
            )
            .add_systems(
                Update,
                (apply_character_commands, run_decision_phase)
                    .chain()
                    .in_set(CharacterSet::Decide),
            )
            .add_systems(
                Update,
                (publish_character_events, update_presentation).in_set(CharacterSet::Publish),
            )
            .add_systems(FixedUpdate, run_physics_phase);

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, dev::spawn_test_room)
            .add_systems(Update, dev::draw_movement_gizmos);
    }
}
