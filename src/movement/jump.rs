//! Movement domain: jump intent, buffering, coyote time and gravity shaping.
//!
//! The decision phase turns jump presses into an intent (`tick`); the
//! physics phase resolves that intent into velocity and recomputes the
//! body's gravity scale (`integrate`).

use bevy::prelude::*;

use crate::content::JumpTuning;
use crate::movement::components::BodyState;
use crate::movement::events::{CharacterEventKind, Outbox};
use crate::movement::input::{Button, InputSnapshot};

/// Threshold below which vertical speed counts as resting.
const REST_EPSILON: f32 = 0.01;
/// Upper clamp on vertical speed; only the fall limit is tunable.
const MAX_RISE_SPEED: f32 = 100.0;

/// Why a jump was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Coyote,
    /// Granted by down-pose on the umbrella tip.
    DownPose { super_charged: bool },
    /// Re-jump granted after letting go of a swing.
    Free,
    Air,
}

/// Which override currently owns velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Dash,
    Swing,
    Hook,
}

/// Ability-supplied falling gravity multipliers, checked in priority order
/// dash, attack, glide. `None` means the ability is not active.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FallModifiers {
    pub dash: Option<f32>,
    pub attack: Option<f32>,
    pub glide: Option<f32>,
}

impl FallModifiers {
    pub fn select(&self) -> Option<f32> {
        self.dash.or(self.attack).or(self.glide)
    }
}

/// A one-shot jump handed over by another controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpGrant {
    pub height_multiplier: f32,
    pub super_charged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JumpController {
    tuning: JumpTuning,
    world_gravity: f32,
    grounded: bool,
    pressing_jump: bool,
    desired_jump: bool,
    jump_buffer_counter: f32,
    coyote_timer: f32,
    air_jumps_remaining: u8,
    free_jump: bool,
    currently_jumping: bool,
    /// Set once the button is released while rising; holds for the arc.
    jump_cut: bool,
    boost_block_timer: f32,
    /// A boost launch forbids air jumps until the next landing.
    boost_arc: bool,
    gravity_multiplier: f32,
    last_jump_speed: f32,
}

impl JumpController {
    pub fn new(tuning: JumpTuning, world_gravity: f32) -> Self {
        Self {
            air_jumps_remaining: tuning.max_air_jumps,
            tuning,
            world_gravity,
            grounded: false,
            pressing_jump: false,
            desired_jump: false,
            jump_buffer_counter: 0.0,
            coyote_timer: 0.0,
            free_jump: false,
            currently_jumping: false,
            jump_cut: false,
            boost_block_timer: 0.0,
            boost_arc: false,
            gravity_multiplier: 1.0,
            last_jump_speed: 0.0,
        }
    }

    pub fn tuning(&self) -> &JumpTuning {
        &self.tuning
    }

    pub fn is_jumping(&self) -> bool {
        self.currently_jumping
    }

    pub fn desired_jump(&self) -> bool {
        self.desired_jump
    }

    pub fn coyote_timer(&self) -> f32 {
        self.coyote_timer
    }

    pub fn air_jumps_remaining(&self) -> u8 {
        self.air_jumps_remaining
    }

    pub fn gravity_multiplier(&self) -> f32 {
        self.gravity_multiplier
    }

    pub fn is_boost_blocked(&self) -> bool {
        self.boost_block_timer > 0.0
    }

    pub fn last_jump_speed(&self) -> f32 {
        self.last_jump_speed
    }

    /// Launch speed for the configured height, independent of gravity scale.
    pub fn jump_speed(&self) -> f32 {
        self.tuning.launch_speed_for(self.tuning.jump_height)
    }

    pub fn on_landed(&mut self) {
        self.air_jumps_remaining = self.tuning.max_air_jumps;
        self.boost_arc = false;
        self.jump_cut = false;
        self.free_jump = false;
    }

    /// Decision phase. Reads jump input after the umbrella, hook and swing
    /// had first refusal. `preempted` drops this frame's press (the
    /// umbrella used the frame for a dash or attack).
    pub fn tick(&mut self, dt: f32, input: &mut InputSnapshot, grounded: bool, preempted: bool) {
        self.grounded = grounded;
        self.pressing_jump = input.held(Button::Jump);

        if input.consume(Button::Jump) {
            if preempted {
                debug!("Jump press dropped: umbrella used this frame");
            } else if !self.is_boost_blocked() {
                self.desired_jump = true;
            }
        }

        if self.boost_block_timer > 0.0 {
            self.boost_block_timer -= dt;
            if self.boost_block_timer <= 0.0 {
                self.boost_block_timer = 0.0;
                self.desired_jump = false;
                self.jump_buffer_counter = 0.0;
            }
        }

        if self.tuning.jump_buffer > 0.0 && self.desired_jump {
            self.jump_buffer_counter += dt;
            if self.jump_buffer_counter > self.tuning.jump_buffer {
                self.desired_jump = false;
                self.jump_buffer_counter = 0.0;
            }
        }

        if !self.currently_jumping && !grounded {
            self.coyote_timer += dt;
        } else {
            self.coyote_timer = 0.0;
        }
    }

    /// True when the next `integrate` will try to resolve a jump. Lets the
    /// caller decide whether to spend a one-shot grant.
    pub fn will_attempt(&self, authority: Option<Authority>) -> bool {
        authority.is_none() && self.desired_jump && !self.is_boost_blocked()
    }

    /// Coyote window is open strictly between the floor and the limit.
    pub fn in_coyote_window(&self) -> bool {
        self.coyote_timer > self.tuning.coyote_floor
            && self.coyote_timer < self.tuning.coyote_time
    }

    /// The kind of jump that would be allowed right now, if any.
    pub fn legal_jump(&self, grant: Option<JumpGrant>) -> Option<JumpKind> {
        if let Some(grant) = grant {
            Some(JumpKind::DownPose {
                super_charged: grant.super_charged,
            })
        } else if self.grounded {
            Some(JumpKind::Ground)
        } else if self.in_coyote_window() {
            Some(JumpKind::Coyote)
        } else if self.free_jump {
            Some(JumpKind::Free)
        } else if !self.boost_arc && self.air_jumps_remaining > 0 {
            Some(JumpKind::Air)
        } else {
            None
        }
    }

    /// Physics phase. Executes a pending jump or shapes gravity; never both
    /// in the same step.
    pub fn integrate(
        &mut self,
        body: &mut BodyState,
        authority: Option<Authority>,
        modifiers: FallModifiers,
        grant: Option<JumpGrant>,
        out: &mut Outbox,
    ) {
        match authority {
            Some(Authority::Hook) => return,
            Some(Authority::Dash) => {
                self.gravity_multiplier = modifiers.dash.unwrap_or(1.0);
                self.apply_gravity_scale(body);
                return;
            }
            Some(Authority::Swing) => {
                self.gravity_multiplier = 1.0;
                self.apply_gravity_scale(body);
                return;
            }
            None => {}
        }

        if self.desired_jump && !self.is_boost_blocked() {
            let jumped = self.try_jump(body, grant, out);
            if self.tuning.jump_buffer == 0.0 {
                self.desired_jump = false;
            }
            if jumped {
                // Recomputing gravity now would clear `currently_jumping`
                // on the step that set it.
                return;
            }
        }

        self.calculate_gravity(body, modifiers);
    }

    fn try_jump(
        &mut self,
        body: &mut BodyState,
        grant: Option<JumpGrant>,
        out: &mut Outbox,
    ) -> bool {
        let Some(kind) = self.legal_jump(grant) else {
            return false;
        };

        let multiplier = grant.map_or(1.0, |g| g.height_multiplier);
        let speed = self.tuning.launch_speed_for(self.tuning.jump_height * multiplier);

        if self.grounded {
            body.velocity.y = 0.0;
        }
        // Rising bodies only gain the difference, so stacked jumps never
        // overshoot the configured height.
        body.velocity.y = body.velocity.y.max(speed);

        if kind == JumpKind::Air {
            self.air_jumps_remaining -= 1;
        }
        // Any executed jump spends the swing grant
        self.free_jump = false;

        self.desired_jump = false;
        self.jump_buffer_counter = 0.0;
        self.coyote_timer = 0.0;
        self.currently_jumping = true;
        self.jump_cut = false;
        self.last_jump_speed = speed;

        debug!(
            "Jump: kind={:?}, speed={:.2}, air_jumps_remaining={}",
            kind, speed, self.air_jumps_remaining
        );
        out.event(CharacterEventKind::Jumped { kind, speed });
        true
    }

    fn calculate_gravity(&mut self, body: &mut BodyState, modifiers: FallModifiers) {
        let vy = body.velocity.y;

        if self.grounded && vy <= REST_EPSILON {
            self.currently_jumping = false;
            self.jump_cut = false;
            self.gravity_multiplier = 1.0;
            body.velocity.y = self.tuning.grounded_stick_velocity;
            self.apply_gravity_scale(body);
            return;
        }

        self.gravity_multiplier = if vy > REST_EPSILON {
            if self.grounded {
                1.0
            } else if self.tuning.variable_jump_height {
                if self.pressing_jump && self.currently_jumping && !self.jump_cut {
                    self.tuning.upward_multiplier
                } else {
                    if self.currently_jumping {
                        self.jump_cut = true;
                    }
                    self.tuning.jump_cut_off
                }
            } else {
                self.tuning.upward_multiplier
            }
        } else if vy < -REST_EPSILON {
            if self.grounded {
                1.0
            } else {
                modifiers
                    .select()
                    .unwrap_or(self.tuning.downward_multiplier)
            }
        } else {
            if self.grounded {
                self.currently_jumping = false;
            }
            1.0
        };

        let floor = if self.tuning.speed_limit > 0.0 {
            -self.tuning.speed_limit
        } else {
            f32::NEG_INFINITY
        };
        body.velocity.y = vy.clamp(floor, MAX_RISE_SPEED);
        self.apply_gravity_scale(body);
    }

    fn apply_gravity_scale(&self, body: &mut BodyState) {
        let shaped = self.tuning.gravity_for(self.tuning.jump_height);
        body.gravity_scale = (shaped / self.world_gravity) * self.gravity_multiplier;
    }

    /// Boosted launch used by the umbrella. Clears buffered intent, blocks
    /// ordinary jumps for a moment and forbids air jumps for the arc.
    pub fn trigger_boost(
        &mut self,
        body: &mut BodyState,
        multiplier: f32,
        velocity_cap: f32,
    ) -> f32 {
        self.desired_jump = false;
        self.jump_buffer_counter = 0.0;
        self.boost_block_timer = self.tuning.boost_jump_block_time;

        let mut speed = self.tuning.launch_speed_for(self.tuning.jump_height * multiplier);
        if velocity_cap > 0.0 {
            speed = speed.min(velocity_cap);
        }
        body.velocity.y = speed;

        self.currently_jumping = true;
        self.jump_cut = false;
        self.coyote_timer = 0.0;
        self.free_jump = false;
        self.boost_arc = true;
        self.last_jump_speed = speed;
        speed
    }

    /// One free re-jump, requested immediately (swing jump).
    pub fn grant_free_jump(&mut self) {
        self.free_jump = true;
        self.desired_jump = true;
        self.jump_buffer_counter = 0.0;
    }
}
