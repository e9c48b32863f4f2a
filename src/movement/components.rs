//! Movement domain: components, physics layers, and the shared body state.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
    /// Triggers (wind zones, gates) - should not block movement
    Sensor,
    /// Swing anchor points
    Anchor,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Zero keeps facing right.
    pub fn from_sign(x: f32) -> Self {
        if x < 0.0 { Facing::Left } else { Facing::Right }
    }
}

/// Rigid-body state the controllers read and write. Copied out of avian
/// before the controllers run and written back after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    /// Multiplier on world gravity. Recomputed by the jump controller.
    pub gravity_scale: f32,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            gravity_scale: 1.0,
        }
    }
}

impl BodyState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..default()
        }
    }
}

/// Facing and gravity scale carried between frames. Position and velocity
/// live on avian's own components.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CharacterBody {
    pub facing: Facing,
    pub gravity_scale: f32,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self {
            facing: Facing::Right,
            gravity_scale: 1.0,
        }
    }
}

impl CharacterBody {
    pub fn state(&self, position: Vec2, velocity: Vec2) -> BodyState {
        BodyState {
            position,
            velocity,
            facing: self.facing,
            gravity_scale: self.gravity_scale,
        }
    }

    pub fn store(&mut self, body: &BodyState) {
        self.facing = body.facing;
        self.gravity_scale = body.gravity_scale;
    }
}

/// Sensor readings gathered by the physics queries each frame.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Senses {
    pub grounded: bool,
    pub tip_touching: bool,
}

/// Attach point the swing anchor assist can snap to.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SwingAnchor {
    pub magnet_radius: f32,
    pub min_alignment: f32,
    pub priority_boost: f32,
}

impl Default for SwingAnchor {
    fn default() -> Self {
        Self {
            magnet_radius: 4.0,
            min_alignment: -0.25,
            priority_boost: 0.0,
        }
    }
}

/// Tint applied to the player sprite per ability, for readability.
#[derive(Component, Debug, Clone, Copy)]
pub struct AbilityTint {
    pub base: Color,
}
