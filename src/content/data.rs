//! Data definitions for the character tuning RON file.
//!
//! These structs mirror assets/data/character.ron. Every field carries a
//! default so a partial file only overrides what it names.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Top-level tuning (character.ron)
// ============================================================================

#[derive(Resource, Debug, Clone, PartialEq, Default, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct CharacterTuning {
    pub body: BodyTuning,
    pub jump: JumpTuning,
    pub umbrella: UmbrellaTuning,
    pub swing: SwingTuning,
    pub hook: HookTuning,
    pub run: RunTuning,
    pub wind: WindTuning,
}

// ============================================================================
// Rigid body
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct BodyTuning {
    pub mass: f32,
    /// World gravity along Y (negative is down).
    pub world_gravity: f32,
    pub size: [f32; 2],
    /// Distance below the collider the ground probe reaches.
    pub ground_probe_distance: f32,
    /// Umbrella tip sensor position relative to the body center.
    pub tip_offset: [f32; 2],
    pub tip_radius: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            mass: 1.0,
            world_gravity: -9.81,
            size: [1.0, 2.0],
            ground_probe_distance: 0.1,
            tip_offset: [0.0, -1.3],
            tip_radius: 0.15,
        }
    }
}

impl BodyTuning {
    pub fn size(&self) -> Vec2 {
        Vec2::from(self.size)
    }

    pub fn tip_offset(&self) -> Vec2 {
        Vec2::from(self.tip_offset)
    }
}

// ============================================================================
// Jump
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct JumpTuning {
    pub jump_height: f32,
    pub time_to_apex: f32,
    pub upward_multiplier: f32,
    pub downward_multiplier: f32,
    pub max_air_jumps: u8,
    pub variable_jump_height: bool,
    pub jump_cut_off: f32,
    /// Terminal fall speed. Non-positive disables the limit.
    pub speed_limit: f32,
    pub coyote_time: f32,
    pub jump_buffer: f32,
    /// Coyote jumps are refused until the timer passes this, so the step
    /// that left the ground cannot grant a second jump.
    pub coyote_floor: f32,
    pub grounded_stick_velocity: f32,
    pub boost_jump_block_time: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            jump_height: 7.3,
            time_to_apex: 0.8,
            upward_multiplier: 1.0,
            downward_multiplier: 6.17,
            max_air_jumps: 0,
            variable_jump_height: true,
            jump_cut_off: 4.0,
            speed_limit: 26.0,
            coyote_time: 0.15,
            jump_buffer: 0.15,
            coyote_floor: 0.03,
            grounded_stick_velocity: -2.0,
            boost_jump_block_time: 0.3,
        }
    }
}

impl JumpTuning {
    /// Gravity that makes `height` peak after `time_to_apex` seconds.
    pub fn gravity_for(&self, height: f32) -> f32 {
        (-2.0 * height) / (self.time_to_apex * self.time_to_apex)
    }

    /// Launch speed for `height`, independent of the body's current
    /// gravity scale.
    pub fn launch_speed_for(&self, height: f32) -> f32 {
        (-2.0 * self.gravity_for(height) * height).max(0.0).sqrt()
    }
}

// ============================================================================
// Umbrella (glide, attack, dash, down pose)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct UmbrellaTuning {
    pub activation_delay: f32,
    pub glide_gravity_multiplier: f32,
    pub glide_fall_speed_cap: f32,
    pub attack_gravity_multiplier: f32,
    pub dash_gravity_multiplier: f32,
    pub dash_wind_up: f32,
    pub dash_duration: f32,
    pub dash_initial_impulse: f32,
    pub dash_force_magnitude: f32,
    /// Force curve end value; the curve eases from 1.0 down to this.
    pub dash_curve_end: f32,
    pub aerial_upward_dash_force: f32,
    pub grounded_upward_dash_force: f32,
    /// Non-positive disables the clamp.
    pub dash_velocity_clamp: f32,
    /// Negative means unlimited.
    pub max_air_dashes: i32,
    pub boost_jump_multiplier: f32,
    /// Non-positive disables the cap.
    pub boost_max_velocity: f32,
    pub super_jump_multiplier: f32,
}

impl Default for UmbrellaTuning {
    fn default() -> Self {
        Self {
            activation_delay: 0.5,
            glide_gravity_multiplier: 0.05,
            glide_fall_speed_cap: 2.5,
            attack_gravity_multiplier: 3.0,
            dash_gravity_multiplier: 0.5,
            dash_wind_up: 0.12,
            dash_duration: 0.35,
            dash_initial_impulse: 30.0,
            dash_force_magnitude: 60.0,
            dash_curve_end: 0.2,
            aerial_upward_dash_force: 12.0,
            grounded_upward_dash_force: 18.0,
            dash_velocity_clamp: 25.0,
            max_air_dashes: -1,
            boost_jump_multiplier: 2.5,
            boost_max_velocity: 25.0,
            super_jump_multiplier: 2.5,
        }
    }
}

// ============================================================================
// Swing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct SwingTuning {
    pub max_probe_distance: f32,
    pub probe_radius: f32,
    pub min_rope_length: f32,
    pub max_rope_length: f32,
    pub vertical_aim_bias: f32,
    pub pump_force: f32,
    pub rope_reel_speed: f32,
    pub rope_length_lerp_speed: f32,
    pub ground_release_velocity: f32,
    pub reattach_delay: f32,
    pub auto_detach_on_ground: bool,
    pub enable_anchor_assist: bool,
    pub max_anchor_candidates: usize,
}

impl Default for SwingTuning {
    fn default() -> Self {
        Self {
            max_probe_distance: 12.0,
            probe_radius: 0.25,
            min_rope_length: 1.25,
            max_rope_length: 8.0,
            vertical_aim_bias: 0.35,
            pump_force: 60.0,
            rope_reel_speed: 3.0,
            rope_length_lerp_speed: 10.0,
            ground_release_velocity: 5.0,
            reattach_delay: 0.2,
            auto_detach_on_ground: true,
            enable_anchor_assist: true,
            max_anchor_candidates: 12,
        }
    }
}

// ============================================================================
// Hook
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct HookTuning {
    pub move_speed: f32,
    pub disable_gravity: bool,
    /// Vertical offset of the body below the rail while attached.
    pub hang_offset: f32,
}

impl Default for HookTuning {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            disable_gravity: true,
            hang_offset: -0.5,
        }
    }
}

// ============================================================================
// Horizontal movement
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct RunTuning {
    pub max_speed: f32,
    pub max_acceleration: f32,
    pub max_deceleration: f32,
    pub max_turn_speed: f32,
    pub max_air_acceleration: f32,
    pub max_air_deceleration: f32,
    pub max_air_turn_speed: f32,
    pub friction: f32,
    pub max_velocity_limit: f32,
    pub use_acceleration: bool,
    pub input_deadzone: f32,
}

impl Default for RunTuning {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            max_acceleration: 52.0,
            max_deceleration: 52.0,
            max_turn_speed: 80.0,
            max_air_acceleration: 40.0,
            max_air_deceleration: 30.0,
            max_air_turn_speed: 80.0,
            friction: 0.0,
            max_velocity_limit: 25.0,
            use_acceleration: true,
            input_deadzone: 0.15,
        }
    }
}

// ============================================================================
// Wind
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Reflect)]
pub enum WindApplication {
    #[default]
    Force,
    Velocity,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct WindTuning {
    pub application: WindApplication,
    pub smooth: bool,
    pub smooth_speed: f32,
}

impl Default for WindTuning {
    fn default() -> Self {
        Self {
            application: WindApplication::Force,
            smooth: true,
            smooth_speed: 5.0,
        }
    }
}
