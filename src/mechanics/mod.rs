//! Mechanics domain: level props and hazards around the character.

mod components;
#[cfg(feature = "dev-tools")]
mod dev;
mod events;
mod systems;
#[cfg(test)]
mod tests;

pub use components::{
    AttackStepDriver, DownPoseGate, PlatformRiser, PushMode, RiseMotion, RisePhase, RiseTarget,
    StreamContact, StreamStep, StreamTuning, ThresholdRiseMover, WaterStream, WaterStreamSpawner,
    ease_in_out,
};
pub use events::ThresholdReached;

use bevy::prelude::*;

use crate::core::CharacterSet;
use crate::mechanics::systems::{
    check_down_pose_gates, count_attack_steps, drive_attack_steps, drive_platform_risers,
    drive_rise_movers, drive_water_streams, hit_by_water_streams, press_water_streams,
    spawn_water_streams, tick_down_pose_gates, track_platform_riders, trigger_rise_movers,
};

pub struct MechanicsPlugin;

impl Plugin for MechanicsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AttackStepDriver>()
            .register_type::<ThresholdRiseMover>()
            .register_type::<DownPoseGate>()
            .register_type::<WaterStream>()
            .register_type::<WaterStreamSpawner>()
            .register_type::<PlatformRiser>()
            .add_message::<ThresholdReached>()
            .add_systems(
                Update,
                (
                    count_attack_steps,
                    trigger_rise_movers,
                    drive_attack_steps,
                    drive_rise_movers,
                    check_down_pose_gates,
                    tick_down_pose_gates,
                )
                    .chain()
                    .after(CharacterSet::Publish),
            )
            .add_systems(
                Update,
                (
                    spawn_water_streams,
                    hit_by_water_streams,
                    press_water_streams,
                    drive_water_streams,
                    track_platform_riders,
                    drive_platform_risers,
                )
                    .chain()
                    .after(CharacterSet::Publish),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, dev::spawn_mechanics_demo);
    }
}
