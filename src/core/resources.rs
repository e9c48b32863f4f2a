//! Core domain: global gate that can switch character input off.

use bevy::prelude::*;

/// Gate that forces every controller to treat input as absent while
/// disabled. A timed disable re-enables itself when the timer lapses.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MovementLimiter {
    enabled: bool,
    /// Remaining seconds of a timed disable, if one is pending.
    disabled_for: Option<f32>,
}

impl Default for MovementLimiter {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_for: None,
        }
    }
}

impl MovementLimiter {
    pub fn can_move(&self) -> bool {
        self.enabled
    }

    /// Set the gate directly. Cancels any pending timed disable.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.disabled_for = None;
    }

    /// Disable for `duration` seconds, replacing any pending timed disable.
    pub fn disable_for(&mut self, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.enabled = false;
        self.disabled_for = Some(duration);
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(remaining) = self.disabled_for.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.enabled = true;
                self.disabled_for = None;
            }
        }
    }
}

/// Run condition: true while the character may receive input.
pub fn movement_allowed(limiter: Res<MovementLimiter>) -> bool {
    limiter.can_move()
}
