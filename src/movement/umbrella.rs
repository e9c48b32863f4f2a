//! Movement domain: umbrella ability state machine.
//!
//! Exactly one of Idle, Glide, Attack, Dash or DownPose is active at a
//! time. Entering any non-idle state first closes the current one, so the
//! invariant holds by construction of [`AbilityState`].

use bevy::prelude::*;
use thiserror::Error;

use crate::content::UmbrellaTuning;
use crate::movement::components::BodyState;
use crate::movement::dash::{DashPhase, DashState, DashStep, clamp_dash_velocity};
use crate::movement::events::{CharacterEventKind, Cue, Outbox};
use crate::movement::ground::{Contact, GroundSensor};
use crate::movement::jump::{FallModifiers, JumpController, JumpGrant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum AbilityState {
    #[default]
    Idle,
    Glide,
    Attack,
    Dash,
    DownPose,
}

/// Refused ability transition. The caller may retry next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a dash is already running")]
    DashActive,
    #[error("the character is swinging")]
    SwingActive,
    #[error("the character is riding a hook rail")]
    HookActive,
    #[error("no air dashes left before landing")]
    QuotaExhausted,
    #[error("the ability is already active")]
    AlreadyActive,
}

/// Parameters of a dash attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashRequest {
    /// Horizontal sign to dash toward when there is no stick input.
    pub direction: f32,
    pub has_horizontal_input: bool,
    pub forced_upward: bool,
    pub grounded: bool,
}

/// What a successful dash request turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashOutcome {
    Dash,
    /// Grounded upward dash resolved as a boosted jump; no quota spent.
    Boost { speed: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UmbrellaController {
    tuning: UmbrellaTuning,
    state: AbilityState,
    glide_timer: f32,
    dash: DashState,
    air_dashes_used: u32,
    tip: GroundSensor,
    super_charge: bool,
    down_pose_jump_used: bool,
}

impl UmbrellaController {
    pub fn new(tuning: UmbrellaTuning) -> Self {
        Self {
            tuning,
            state: AbilityState::Idle,
            glide_timer: 0.0,
            dash: DashState::default(),
            air_dashes_used: 0,
            tip: GroundSensor::default(),
            super_charge: false,
            down_pose_jump_used: false,
        }
    }

    pub fn tuning(&self) -> &UmbrellaTuning {
        &self.tuning
    }

    pub fn state(&self) -> AbilityState {
        self.state
    }

    pub fn is_gliding(&self) -> bool {
        self.state == AbilityState::Glide
    }

    pub fn is_attacking(&self) -> bool {
        self.state == AbilityState::Attack
    }

    pub fn is_dash_active(&self) -> bool {
        self.state == AbilityState::Dash
    }

    pub fn is_down_pose(&self) -> bool {
        self.state == AbilityState::DownPose
    }

    pub fn dash_phase(&self) -> DashPhase {
        self.dash.phase
    }

    pub fn glide_timer(&self) -> f32 {
        self.glide_timer
    }

    pub fn air_dashes_used(&self) -> u32 {
        self.air_dashes_used
    }

    pub fn has_super_charge(&self) -> bool {
        self.super_charge
    }

    pub fn tip_touching(&self) -> bool {
        self.tip.is_touching()
    }

    /// Falling gravity multipliers for whichever state is active.
    pub fn fall_modifiers(&self) -> FallModifiers {
        FallModifiers {
            dash: self
                .is_dash_active()
                .then_some(self.tuning.dash_gravity_multiplier),
            attack: self
                .is_attacking()
                .then_some(self.tuning.attack_gravity_multiplier),
            glide: self
                .is_gliding()
                .then_some(self.tuning.glide_gravity_multiplier),
        }
    }

    /// Air dash quota refills whenever the body stands on ground.
    pub fn notify_grounded(&mut self, grounded: bool) {
        if grounded {
            self.air_dashes_used = 0;
        }
    }

    fn quota_exhausted(&self) -> bool {
        let quota = self.tuning.max_air_dashes;
        quota >= 0 && self.air_dashes_used >= quota as u32
    }

    /// Leave the current state, announcing it, and fall back to idle.
    fn exit_current(&mut self, out: &mut Outbox) {
        match self.state {
            AbilityState::Idle => {}
            AbilityState::Glide => {
                self.glide_timer = 0.0;
                out.event(CharacterEventKind::GlideClosed);
                out.cue(Cue::UmbrellaSpin { on: false });
            }
            AbilityState::Attack => {
                out.event(CharacterEventKind::AttackReleased);
                out.cue(Cue::AttackSpin { on: false });
            }
            AbilityState::Dash => {
                self.dash = DashState::default();
                debug!("Dash ended");
                out.event(CharacterEventKind::DashEnded);
            }
            AbilityState::DownPose => {
                self.super_charge = false;
                self.down_pose_jump_used = false;
                out.event(CharacterEventKind::DownPoseExited);
                out.cue(Cue::DownPose { on: false });
            }
        }
        self.state = AbilityState::Idle;
    }

    // ------------------------------------------------------------------
    // Glide
    // ------------------------------------------------------------------

    /// Decision phase glide bookkeeping. The timer accumulates while jump
    /// is held in the air; the glide opens once it passes the activation
    /// delay and no other ability holds the slot.
    pub fn update_glide(&mut self, pressing_jump: bool, grounded: bool, dt: f32, out: &mut Outbox) {
        let accumulate = !grounded && pressing_jump;

        match self.state {
            AbilityState::Attack | AbilityState::DownPose => self.glide_timer = 0.0,
            AbilityState::Dash => {
                if accumulate {
                    self.glide_timer += dt;
                } else {
                    self.glide_timer = 0.0;
                }
            }
            AbilityState::Glide => {
                if accumulate {
                    self.glide_timer += dt;
                } else {
                    self.exit_current(out);
                }
            }
            AbilityState::Idle => {
                if accumulate {
                    self.glide_timer += dt;
                    if self.glide_timer >= self.tuning.activation_delay {
                        self.state = AbilityState::Glide;
                        debug!("Glide opened after {:.2}s", self.glide_timer);
                        out.event(CharacterEventKind::GlideOpened);
                        out.cue(Cue::UmbrellaSpin { on: true });
                    }
                } else {
                    self.glide_timer = 0.0;
                }
            }
        }
    }

    /// Cap downward speed while gliding.
    pub fn clamp_glide(&self, body: &mut BodyState) {
        if !self.is_gliding() || self.tuning.glide_fall_speed_cap <= 0.0 {
            return;
        }
        let max_down = -self.tuning.glide_fall_speed_cap.abs();
        if body.velocity.y < max_down {
            body.velocity.y = max_down;
        }
    }

    // ------------------------------------------------------------------
    // Attack
    // ------------------------------------------------------------------

    pub fn try_trigger_attack(&mut self, out: &mut Outbox) -> Result<(), TransitionError> {
        match self.state {
            AbilityState::Dash => return Err(TransitionError::DashActive),
            AbilityState::Attack => return Err(TransitionError::AlreadyActive),
            _ => {}
        }
        self.exit_current(out);
        self.state = AbilityState::Attack;
        debug!("Umbrella attack fired");
        out.event(CharacterEventKind::AttackFired);
        out.cue(Cue::AttackTrigger);
        out.cue(Cue::AttackSpin { on: true });
        Ok(())
    }

    pub fn release_attack(&mut self, out: &mut Outbox) {
        if self.is_attacking() {
            self.exit_current(out);
        }
    }

    // ------------------------------------------------------------------
    // Dash
    // ------------------------------------------------------------------

    pub fn try_start_dash(
        &mut self,
        request: DashRequest,
        jump: &mut JumpController,
        body: &mut BodyState,
        out: &mut Outbox,
    ) -> Result<DashOutcome, TransitionError> {
        if self.is_dash_active() {
            return Err(TransitionError::DashActive);
        }
        self.exit_current(out);

        if !request.grounded && self.quota_exhausted() {
            debug!("Dash refused: {} air dashes used", self.air_dashes_used);
            return Err(TransitionError::QuotaExhausted);
        }

        if request.grounded && request.forced_upward {
            let speed = jump.trigger_boost(
                body,
                self.tuning.boost_jump_multiplier,
                self.tuning.boost_max_velocity,
            );
            debug!("Grounded upward dash became a boost jump: speed={:.2}", speed);
            out.event(CharacterEventKind::BoostJump { speed });
            out.cue(Cue::DashVisual { down: true });
            return Ok(DashOutcome::Boost { speed });
        }

        let has_direction = request.has_horizontal_input && request.direction != 0.0;
        let mut lateral = if has_direction {
            Vec2::new(request.direction.signum(), 0.0)
        } else {
            Vec2::ZERO
        };
        if lateral == Vec2::ZERO && !request.forced_upward {
            let sign = if request.direction == 0.0 {
                1.0
            } else {
                request.direction.signum()
            };
            lateral = Vec2::new(sign, 0.0);
        }

        self.dash = DashState::start(lateral, request.forced_upward, request.grounded);
        self.state = AbilityState::Dash;
        if !request.grounded {
            self.air_dashes_used += 1;
        }

        debug!(
            "Dash started: direction={:?}, upward={}, grounded={}, air_dashes_used={}",
            lateral, request.forced_upward, request.grounded, self.air_dashes_used
        );
        out.event(CharacterEventKind::DashStarted {
            direction: lateral,
            grounded: request.grounded,
        });
        out.cue(Cue::DashVisual {
            down: request.forced_upward,
        });
        out.cue(Cue::DashTrigger);
        Ok(DashOutcome::Dash)
    }

    /// Physics phase dash update. Runs before any other integrator.
    pub fn fixed_update_dash(&mut self, body: &mut BodyState, dt: f32, mass: f32, out: &mut Outbox) {
        if !self.is_dash_active() {
            return;
        }
        match self.dash.step(body, dt, mass, &self.tuning) {
            DashStep::Launched => debug!("Dash launched: velocity={:?}", body.velocity),
            DashStep::Finished => {
                self.state = AbilityState::Idle;
                debug!("Dash ended");
                out.event(CharacterEventKind::DashEnded);
            }
            _ => {}
        }
    }

    /// Stop a running dash early. The air dash stays spent.
    pub fn halt_dash(&mut self, out: &mut Outbox) -> bool {
        if !self.is_dash_active() {
            return false;
        }
        self.exit_current(out);
        true
    }

    /// Terminal velocity clamp while a dash is running, wind-up included.
    pub fn clamp_dash(&self, body: &mut BodyState) {
        if self.is_dash_active() {
            clamp_dash_velocity(body, self.tuning.dash_velocity_clamp);
        }
    }

    // ------------------------------------------------------------------
    // Down pose
    // ------------------------------------------------------------------

    /// Enter the held down pose. Entering on the ground launches a boosted
    /// jump at once, which spends the charge that entry grants.
    pub fn begin_down_pose(
        &mut self,
        grounded: bool,
        jump: &mut JumpController,
        body: &mut BodyState,
        out: &mut Outbox,
    ) -> Result<Option<f32>, TransitionError> {
        match self.state {
            AbilityState::Dash => return Err(TransitionError::DashActive),
            AbilityState::DownPose => return Err(TransitionError::AlreadyActive),
            _ => {}
        }
        self.exit_current(out);
        self.state = AbilityState::DownPose;
        self.super_charge = false;
        self.down_pose_jump_used = false;
        out.event(CharacterEventKind::DownPoseEntered);
        out.cue(Cue::DownPose { on: true });

        if !grounded {
            debug!("Down pose entered in the air");
            return Ok(None);
        }

        let speed = jump.trigger_boost(
            body,
            self.tuning.boost_jump_multiplier,
            self.tuning.boost_max_velocity,
        );
        self.down_pose_jump_used = true;
        debug!("Down pose entered on ground: boost speed={:.2}", speed);
        out.event(CharacterEventKind::BoostJump { speed });
        Ok(Some(speed))
    }

    pub fn end_down_pose(&mut self, out: &mut Outbox) {
        if self.is_down_pose() {
            self.exit_current(out);
        }
    }

    /// Feed the umbrella tip sensor. Re-touching while in the pose re-arms
    /// exactly one more down-pose jump, carrying a super charge.
    pub fn update_tip(&mut self, touching: bool) {
        if self.tip.update(touching) == Contact::Landed && self.is_down_pose() {
            self.down_pose_jump_used = false;
            self.super_charge = true;
            debug!("Umbrella tip touched: down-pose jump re-armed");
        }
    }

    pub fn can_down_pose_jump(&self) -> bool {
        self.is_down_pose() && self.tip.is_touching() && !self.down_pose_jump_used
    }

    /// Spend the down-pose jump. Carries the super multiplier when a
    /// charge is present.
    pub fn consume_down_pose_jump(&mut self) -> Option<JumpGrant> {
        if !self.can_down_pose_jump() {
            return None;
        }
        self.down_pose_jump_used = true;
        let super_charged = std::mem::take(&mut self.super_charge);
        Some(JumpGrant {
            height_multiplier: if super_charged {
                self.tuning.super_jump_multiplier
            } else {
                1.0
            },
            super_charged,
        })
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Unconditional reset to the freshly constructed state.
    pub fn force_close(&mut self, out: &mut Outbox) {
        self.exit_current(out);
        *self = Self::new(self.tuning.clone());
    }
}
