//! Mechanics domain: events for level prop triggers.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Event fired when a step driver first reaches its threshold
#[derive(Debug, Clone, Copy)]
pub struct ThresholdReached {
    pub driver: Entity,
}

impl Message for ThresholdReached {}
