//! Movement domain: horizontal run integration.

use crate::content::RunTuning;
use crate::movement::components::{BodyState, Facing};

/// Sign used for turn detection. Zero counts as positive.
fn turn_sign(x: f32) -> f32 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Step `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovementController {
    tuning: RunTuning,
    direction: f32,
    desired_velocity: f32,
    pressing_key: bool,
    ignore_input_timer: f32,
}

impl MovementController {
    pub fn new(tuning: RunTuning) -> Self {
        Self {
            tuning,
            direction: 0.0,
            desired_velocity: 0.0,
            pressing_key: false,
            ignore_input_timer: 0.0,
        }
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn desired_velocity(&self) -> f32 {
        self.desired_velocity
    }

    pub fn is_ignoring_input(&self) -> bool {
        self.ignore_input_timer > 0.0
    }

    /// Read input but force the resulting direction to zero for
    /// `duration` seconds. Replaces any pending window.
    pub fn ignore_input_for(&mut self, duration: f32) {
        self.ignore_input_timer = duration.max(0.0);
    }

    /// Decision phase: resolve direction, facing and target speed.
    pub fn tick(&mut self, dt: f32, move_x: f32, blocked: bool, body: &mut BodyState) {
        if self.ignore_input_timer > 0.0 {
            self.ignore_input_timer = (self.ignore_input_timer - dt).max(0.0);
        }

        self.direction = if blocked || self.is_ignoring_input() {
            0.0
        } else {
            move_x
        };

        if self.direction != 0.0 {
            body.facing = Facing::from_sign(self.direction);
            self.pressing_key = true;
        } else {
            self.pressing_key = false;
        }

        let speed = (self.tuning.max_speed - self.tuning.friction).max(0.0);
        self.desired_velocity = self.direction * speed;
    }

    /// Physics phase. Skipped by the caller while another controller owns
    /// velocity.
    pub fn integrate(&self, body: &mut BodyState, grounded: bool, dt: f32) {
        let vx = body.velocity.x;

        if self.tuning.use_acceleration || !grounded {
            let rate = self.rate(vx, grounded);
            body.velocity.x = move_towards(vx, self.desired_velocity, rate * dt);
        } else {
            body.velocity.x = self.desired_velocity;
        }

        if self.tuning.max_velocity_limit > 0.0 {
            body.velocity = body.velocity.clamp_length_max(self.tuning.max_velocity_limit);
        }
    }

    fn rate(&self, vx: f32, grounded: bool) -> f32 {
        let t = &self.tuning;
        let turning = turn_sign(self.direction) != turn_sign(vx);
        match (self.pressing_key, turning, grounded) {
            (true, true, true) => t.max_turn_speed,
            (true, true, false) => t.max_air_turn_speed,
            (true, false, true) => t.max_acceleration,
            (true, false, false) => t.max_air_acceleration,
            (false, _, true) => t.max_deceleration,
            (false, _, false) => t.max_air_deceleration,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}
