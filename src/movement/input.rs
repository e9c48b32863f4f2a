//! Movement domain: per-frame input snapshot with held and consume-once reads.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Jump,
    /// Umbrella attack; also grabs hook rails.
    Action,
    Dash,
    /// Swing attach/release.
    Interact,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Jump, Button::Action, Button::Dash, Button::Interact];

    fn index(self) -> usize {
        match self {
            Button::Jump => 0,
            Button::Action => 1,
            Button::Dash => 2,
            Button::Interact => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ButtonState {
    held: bool,
    /// Latched on the press edge, cleared by [`InputSnapshot::consume`].
    pressed: bool,
}

/// Semantic input for one character. `held` is level-triggered; `pressed`
/// is latched until some controller consumes it, so a later read in the
/// same frame sees it cleared.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    move_axis: Vec2,
    buttons: [ButtonState; 4],
}

impl InputSnapshot {
    pub const DOWN_THRESHOLD: f32 = -0.5;
    pub const UP_THRESHOLD: f32 = 0.5;

    /// Store the movement vector, dropping drift under `deadzone`.
    pub fn set_move(&mut self, raw: Vec2, deadzone: f32) {
        self.move_axis = if raw.length_squared() < deadzone * deadzone {
            Vec2::ZERO
        } else {
            raw
        };
    }

    pub fn move_axis(&self) -> Vec2 {
        self.move_axis
    }

    /// Record this frame's device state. A press stays latched across
    /// frames until consumed.
    pub fn set_button(&mut self, button: Button, held: bool, just_pressed: bool) {
        let state = &mut self.buttons[button.index()];
        state.held = held || just_pressed;
        if just_pressed {
            state.pressed = true;
        }
    }

    /// Convenience for tests and scripted input: press and hold.
    pub fn press(&mut self, button: Button) {
        self.set_button(button, true, true);
    }

    pub fn release(&mut self, button: Button) {
        self.buttons[button.index()].held = false;
    }

    pub fn held(&self, button: Button) -> bool {
        self.buttons[button.index()].held
    }

    pub fn peek(&self, button: Button) -> bool {
        self.buttons[button.index()].pressed
    }

    /// Returns the latched press and clears it.
    pub fn consume(&mut self, button: Button) -> bool {
        std::mem::take(&mut self.buttons[button.index()].pressed)
    }

    pub fn down_held(&self) -> bool {
        self.move_axis.y < Self::DOWN_THRESHOLD
    }

    pub fn up_held(&self) -> bool {
        self.move_axis.y > Self::UP_THRESHOLD
    }

    /// Treat every input as absent.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
