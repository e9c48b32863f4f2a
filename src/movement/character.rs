//! Movement domain: the composed character controller.
//!
//! `CharacterController` owns every sub-controller and runs them in a fixed
//! order. The decision phase (`tick`) senses ground, resolves ability
//! transitions, then hands leftover jump input to the jump controller. The
//! physics phase (`fixed_tick`) settles velocity authority and integrates.

use bevy::prelude::*;

use crate::content::CharacterTuning;
use crate::movement::components::BodyState;
use crate::movement::events::{CharacterEventKind, Outbox};
use crate::movement::ground::{Contact, GroundSensor};
use crate::movement::hook::{HookController, RailPath};
use crate::movement::horizontal::MovementController;
use crate::movement::input::{Button, InputSnapshot};
use crate::movement::jump::{Authority, JumpController};
use crate::movement::swing::{AnchorCandidate, AnchorProbe, NoProbe, SwingController};
use crate::movement::umbrella::{
    AbilityState, DashOutcome, DashRequest, TransitionError, UmbrellaController,
};
use crate::movement::wind::{WindController, WindZone};

/// What the physics queries saw around the character this frame.
pub struct Surroundings<'a> {
    pub grounded: bool,
    pub tip_touching: bool,
    pub anchors: &'a [AnchorCandidate],
    pub rails: &'a [RailPath],
    pub probe: &'a dyn AnchorProbe,
}

impl Surroundings<'static> {
    /// Open air: nothing to stand on or grab.
    pub fn airborne() -> Self {
        Self {
            grounded: false,
            tip_touching: false,
            anchors: &[],
            rails: &[],
            probe: &NoProbe,
        }
    }

    pub fn on_ground() -> Self {
        Self {
            grounded: true,
            ..Self::airborne()
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct CharacterController {
    tuning: CharacterTuning,
    ground: GroundSensor,
    jump: JumpController,
    umbrella: UmbrellaController,
    swing: SwingController,
    hook: HookController,
    movement: MovementController,
    wind: WindController,
    /// Last decision-phase move axis, read by the swing pump.
    move_axis: Vec2,
    /// Down modifier already produced a down pose this press.
    down_latch: bool,
    outbox: Outbox,
}

impl CharacterController {
    pub fn new(tuning: CharacterTuning) -> Self {
        Self {
            ground: GroundSensor::default(),
            jump: JumpController::new(tuning.jump.clone(), tuning.body.world_gravity),
            umbrella: UmbrellaController::new(tuning.umbrella.clone()),
            swing: SwingController::new(tuning.swing.clone()),
            hook: HookController::new(tuning.hook.clone()),
            movement: MovementController::new(tuning.run.clone()),
            wind: WindController::new(tuning.wind.clone()),
            move_axis: Vec2::ZERO,
            down_latch: false,
            outbox: Outbox::default(),
            tuning,
        }
    }

    pub fn tuning(&self) -> &CharacterTuning {
        &self.tuning
    }

    pub fn jump(&self) -> &JumpController {
        &self.jump
    }

    pub fn umbrella(&self) -> &UmbrellaController {
        &self.umbrella
    }

    pub fn swing(&self) -> &SwingController {
        &self.swing
    }

    pub fn hook(&self) -> &HookController {
        &self.hook
    }

    pub fn movement(&self) -> &MovementController {
        &self.movement
    }

    pub fn wind(&self) -> &WindController {
        &self.wind
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_grounded(&self) -> bool {
        self.ground.is_touching()
    }

    pub fn ability_state(&self) -> AbilityState {
        self.umbrella.state()
    }

    pub fn is_gliding(&self) -> bool {
        self.umbrella.is_gliding()
    }

    pub fn is_dash_active(&self) -> bool {
        self.umbrella.is_dash_active()
    }

    pub fn is_swinging(&self) -> bool {
        self.swing.is_swinging()
    }

    pub fn is_hooking(&self) -> bool {
        self.hook.is_hooking()
    }

    pub fn can_down_pose_jump(&self) -> bool {
        self.umbrella.can_down_pose_jump()
    }

    /// Controller currently owning velocity, in priority order.
    pub fn authority(&self) -> Option<Authority> {
        if self.umbrella.is_dash_active() {
            Some(Authority::Dash)
        } else if self.swing.is_swinging() {
            Some(Authority::Swing)
        } else if self.hook.is_hooking() {
            Some(Authority::Hook)
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Decision phase
    // ------------------------------------------------------------------

    /// Run one decision step. A missing input snapshot reads as no input.
    pub fn tick(
        &mut self,
        dt: f32,
        input: Option<&mut InputSnapshot>,
        limiter_open: bool,
        body: &mut BodyState,
        surroundings: &Surroundings,
    ) {
        let mut absent = InputSnapshot::default();
        let input = input.unwrap_or(&mut absent);
        let out = &mut self.outbox;

        if !limiter_open {
            input.clear();
            self.swing.release(false, out);
        }

        match self.ground.update(surroundings.grounded) {
            Contact::Landed => {
                self.jump.on_landed();
                debug!("Landed: air_jumps_remaining={}", self.jump.air_jumps_remaining());
                out.event(CharacterEventKind::Landed);
            }
            Contact::Left => {
                debug!("Left ground");
                out.event(CharacterEventKind::LeftGround);
            }
            Contact::Unchanged => {}
        }
        let grounded = self.ground.is_touching();
        self.umbrella.notify_grounded(grounded);

        let axis = input.move_axis();
        let swinging = self.swing.is_swinging();
        let hooking = self.hook.is_hooking();
        let mut preempted = false;

        if swinging {
            self.umbrella.release_attack(out);
        } else if !hooking {
            let down = input.down_held();
            if down && !self.down_latch {
                match self.umbrella.begin_down_pose(grounded, &mut self.jump, body, out) {
                    Ok(_) | Err(TransitionError::AlreadyActive) => self.down_latch = true,
                    Err(e) => debug!("Down pose refused: {}", e),
                }
            } else if !down {
                self.down_latch = false;
                self.umbrella.end_down_pose(out);
            }

            if input.consume(Button::Action) {
                match self.umbrella.try_trigger_attack(out) {
                    Ok(()) => preempted = true,
                    Err(e) => debug!("Attack refused: {}", e),
                }
            }

            if input.consume(Button::Dash) {
                let request = DashRequest {
                    direction: if axis.x != 0.0 { axis.x } else { body.facing.sign() },
                    has_horizontal_input: axis.x != 0.0,
                    forced_upward: input.up_held(),
                    grounded,
                };
                match self
                    .umbrella
                    .try_start_dash(request, &mut self.jump, body, out)
                {
                    Ok(_) => preempted = true,
                    Err(e) => debug!("Dash refused: {}", e),
                }
            }
        }
        if !input.held(Button::Action) {
            self.umbrella.release_attack(out);
        }

        self.umbrella.update_tip(surroundings.tip_touching);
        self.umbrella
            .update_glide(input.held(Button::Jump), grounded, dt, out);
        self.umbrella.clamp_glide(body);

        self.hook
            .update(dt, input, body, surroundings.rails, &mut self.umbrella, out);
        if self.hook.is_hooking() && !hooking {
            self.swing.release(false, out);
        }

        if !self.hook.is_hooking()
            && self
                .swing
                .update(dt, input, body, surroundings, &mut self.jump, out)
        {
            self.umbrella.force_close(out);
        }

        self.jump.tick(dt, input, grounded, preempted);

        let blocked = self.hook.is_hooking() || !limiter_open;
        self.move_axis = input.move_axis();
        self.movement.tick(dt, self.move_axis.x, blocked, body);
    }

    // ------------------------------------------------------------------
    // Physics phase
    // ------------------------------------------------------------------

    /// Run one fixed physics step. Terminal constraints run last so they
    /// hold at the end of every step.
    pub fn fixed_tick(&mut self, dt: f32, body: &mut BodyState) {
        let mass = self.tuning.body.mass.max(f32::EPSILON);
        let grounded = self.ground.is_touching();

        self.umbrella
            .fixed_update_dash(body, dt, mass, &mut self.outbox);
        let authority = self.authority();
        let out = &mut self.outbox;

        let grant = if self.jump.will_attempt(authority) {
            self.umbrella.consume_down_pose_jump()
        } else {
            None
        };
        self.jump
            .integrate(body, authority, self.umbrella.fall_modifiers(), grant, out);

        if authority.is_none() {
            self.movement.integrate(body, grounded, dt);
        }

        self.swing.apply_pump(body, self.move_axis, dt, mass);

        if !self.hook.is_hooking() {
            let gliding = self.umbrella.is_gliding();
            self.wind.fixed_update(body, dt, mass, grounded, gliding);
            body.velocity.y += self.tuning.body.world_gravity * body.gravity_scale * dt;
        }

        self.swing.apply_constraint(body);
        self.umbrella.clamp_dash(body);
        self.umbrella.clamp_glide(body);
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn force_close_umbrella(&mut self) {
        self.umbrella.force_close(&mut self.outbox);
        self.down_latch = false;
    }

    fn ensure_umbrella_free(&self) -> Result<(), TransitionError> {
        if self.swing.is_swinging() {
            Err(TransitionError::SwingActive)
        } else if self.hook.is_hooking() {
            Err(TransitionError::HookActive)
        } else {
            Ok(())
        }
    }

    pub fn try_trigger_attack(&mut self) -> Result<(), TransitionError> {
        self.ensure_umbrella_free()?;
        self.umbrella.try_trigger_attack(&mut self.outbox)
    }

    /// Dash toward the last move input, or the facing direction.
    pub fn try_start_dash(&mut self, body: &mut BodyState) -> Result<DashOutcome, TransitionError> {
        self.ensure_umbrella_free()?;
        let axis = self.move_axis;
        let request = DashRequest {
            direction: if axis.x != 0.0 { axis.x } else { body.facing.sign() },
            has_horizontal_input: axis.x != 0.0,
            forced_upward: axis.y > InputSnapshot::UP_THRESHOLD,
            grounded: self.ground.is_touching(),
        };
        self.umbrella
            .try_start_dash(request, &mut self.jump, body, &mut self.outbox)
    }

    pub fn begin_down_pose(&mut self, body: &mut BodyState) -> Result<Option<f32>, TransitionError> {
        self.ensure_umbrella_free()?;
        let grounded = self.ground.is_touching();
        self.umbrella
            .begin_down_pose(grounded, &mut self.jump, body, &mut self.outbox)
    }

    pub fn end_down_pose(&mut self) {
        self.umbrella.end_down_pose(&mut self.outbox);
    }

    pub fn force_stop_hook(&mut self, body: &mut BodyState) {
        self.hook.force_stop(body, &mut self.outbox);
    }

    /// Drop the rope. A non-immediate release starts the reattach cooldown.
    pub fn release_swing(&mut self, immediate: bool) {
        self.swing.release(!immediate, &mut self.outbox);
    }

    pub fn ignore_input_for(&mut self, duration: f32) {
        self.movement.ignore_input_for(duration);
    }

    /// True while the umbrella is held open in front of the character.
    pub fn is_umbrella_open(&self) -> bool {
        matches!(
            self.umbrella.state(),
            AbilityState::Glide | AbilityState::Attack | AbilityState::DownPose
        )
    }

    /// Stop a running dash and the body with it.
    pub fn halt_dash(&mut self, body: &mut BodyState) -> bool {
        if !self.umbrella.halt_dash(&mut self.outbox) {
            return false;
        }
        body.velocity = Vec2::ZERO;
        true
    }

    /// Environmental shove: drop current motion, apply `impulse` and ignore
    /// move input for `ignore_input` seconds.
    pub fn knock_back(&mut self, body: &mut BodyState, impulse: Vec2, ignore_input: f32) {
        let mass = self.tuning.body.mass.max(f32::EPSILON);
        body.velocity = impulse / mass;
        self.movement.ignore_input_for(ignore_input);
        debug!("Knocked back: velocity={:?}", body.velocity);
    }

    /// Continuous external force over `dt`.
    pub fn push(&mut self, body: &mut BodyState, force: Vec2, dt: f32) {
        let mass = self.tuning.body.mass.max(f32::EPSILON);
        body.velocity += force / mass * dt;
    }

    pub fn enter_wind_zone(&mut self, entity: Entity, zone: WindZone) {
        self.wind.enter(entity, zone);
    }

    pub fn exit_wind_zone(&mut self, entity: Entity) {
        self.wind.exit(entity);
    }

    /// Respawn: cancel every override and return to a freshly built state.
    /// Occupied wind zones are kept.
    pub fn reset(&mut self, body: &mut BodyState) {
        self.umbrella.force_close(&mut self.outbox);
        self.hook.force_stop(body, &mut self.outbox);
        self.swing.release(false, &mut self.outbox);
        self.swing.reset();
        self.hook.reset();
        self.jump = JumpController::new(self.tuning.jump.clone(), self.tuning.body.world_gravity);
        self.movement.reset();
        self.wind.reset();
        self.ground = GroundSensor::default();
        self.down_latch = false;
        self.move_axis = Vec2::ZERO;
        body.velocity = Vec2::ZERO;
        body.gravity_scale = 1.0;
    }

    /// Hand over everything raised since the last drain.
    pub fn drain(&mut self) -> Outbox {
        std::mem::take(&mut self.outbox)
    }
}
