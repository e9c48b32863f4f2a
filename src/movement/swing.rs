//! Movement domain: rope swing with anchor assist and a rigid length
//! constraint.

use bevy::prelude::*;

use crate::content::SwingTuning;
use crate::movement::character::Surroundings;
use crate::movement::components::BodyState;
use crate::movement::events::{CharacterEventKind, Cue, Outbox};
use crate::movement::input::{Button, InputSnapshot};
use crate::movement::jump::JumpController;

/// Axis magnitude under which pump and reel input is ignored.
const AXIS_EPSILON: f32 = 0.01;

/// Attach point seen by the anchor assist this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorCandidate {
    /// Source entity, used to follow anchors that move while attached.
    pub entity: Option<Entity>,
    pub position: Vec2,
    pub magnet_radius: f32,
    pub min_alignment: f32,
    pub priority_boost: f32,
}

impl AnchorCandidate {
    pub fn at(position: Vec2) -> Self {
        Self {
            entity: None,
            position,
            magnet_radius: 4.0,
            min_alignment: -0.25,
            priority_boost: 0.0,
        }
    }

    /// Higher is better. Closer and better aligned anchors win, shifted
    /// by the authored priority.
    pub fn score(&self, alignment: f32, distance: f32) -> f32 {
        let proximity = 1.0 - (distance / self.magnet_radius.max(0.001)).clamp(0.0, 1.0);
        self.priority_boost + alignment + proximity
    }
}

/// First thing hit by the fallback probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub point: Vec2,
    pub distance: f32,
    pub entity: Option<Entity>,
}

/// Directional sweep used when no assisted anchor qualifies.
pub trait AnchorProbe {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32, radius: f32)
    -> Option<ProbeHit>;
}

/// Probe for worlds without swingable geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl AnchorProbe for NoProbe {
    fn cast(&self, _: Vec2, _: Vec2, _: f32, _: f32) -> Option<ProbeHit> {
        None
    }
}

/// Aim from stick input, falling back to facing, tilted upward by `bias`
/// unless the player is clearly aiming down.
pub fn aim_direction(axis: Vec2, facing_sign: f32, bias: f32) -> Vec2 {
    let aim = if axis.length_squared() < 0.01 {
        Vec2::new(facing_sign, bias)
    } else if axis.y > -0.1 {
        Vec2::new(axis.x, axis.y + bias)
    } else {
        axis
    };
    aim.normalize_or(Vec2::Y)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwingController {
    tuning: SwingTuning,
    attached: bool,
    anchor: Vec2,
    anchor_entity: Option<Entity>,
    rope_length: f32,
    cooldown: f32,
}

impl SwingController {
    pub fn new(tuning: SwingTuning) -> Self {
        Self {
            tuning,
            attached: false,
            anchor: Vec2::ZERO,
            anchor_entity: None,
            rope_length: 0.0,
            cooldown: 0.0,
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.attached
    }

    pub fn anchor(&self) -> Option<Vec2> {
        self.attached.then_some(self.anchor)
    }

    pub fn rope_length(&self) -> f32 {
        self.rope_length
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Decision phase. Returns true on the frame the rope attaches so the
    /// caller can close the umbrella.
    pub fn update(
        &mut self,
        dt: f32,
        input: &mut InputSnapshot,
        body: &BodyState,
        surroundings: &Surroundings,
        jump: &mut JumpController,
        out: &mut Outbox,
    ) -> bool {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }

        let pressed = input.consume(Button::Interact);
        let jump_pressed = self.attached && input.consume(Button::Jump);

        if !self.attached {
            return pressed
                && self.cooldown <= 0.0
                && self.try_attach(input.move_axis(), body, surroundings, out);
        }

        self.refresh_anchor(surroundings, out);
        if !self.attached {
            return false;
        }

        if jump_pressed {
            self.release(true, out);
            jump.grant_free_jump();
            debug!("Swing jump: free re-jump granted");
        } else if pressed {
            self.release(true, out);
        } else if self.tuning.auto_detach_on_ground
            && surroundings.grounded
            && body.velocity.length() <= self.tuning.ground_release_velocity
        {
            debug!("Swing auto-released on ground");
            self.release(true, out);
        }
        false
    }

    /// Follow an anchor that moves. A vanished anchor drops the rope.
    fn refresh_anchor(&mut self, surroundings: &Surroundings, out: &mut Outbox) {
        let Some(entity) = self.anchor_entity else {
            return;
        };
        match surroundings.anchors.iter().find(|a| a.entity == Some(entity)) {
            Some(candidate) => self.anchor = candidate.position,
            None => {
                debug!("Swing anchor {:?} is gone", entity);
                self.release(false, out);
            }
        }
    }

    fn try_attach(
        &mut self,
        axis: Vec2,
        body: &BodyState,
        surroundings: &Surroundings,
        out: &mut Outbox,
    ) -> bool {
        let origin = body.position;
        let aim = aim_direction(axis, body.facing.sign(), self.tuning.vertical_aim_bias);

        let assisted = if self.tuning.enable_anchor_assist {
            self.select_assisted_anchor(origin, aim, surroundings.anchors)
                .copied()
        } else {
            None
        };
        if let Some(candidate) = assisted {
            let distance = candidate.position.distance(origin);
            self.attach(candidate.position, candidate.entity, distance, out);
            return true;
        }

        let radius = self.tuning.probe_radius.max(0.01);
        match surroundings
            .probe
            .cast(origin, aim, self.tuning.max_probe_distance, radius)
        {
            Some(hit) => {
                self.attach(hit.point, hit.entity, hit.distance, out);
                true
            }
            None => {
                debug!("Swing probe found nothing along {:?}", aim);
                false
            }
        }
    }

    /// Best scored anchor in range. Ties keep the first candidate seen.
    pub fn select_assisted_anchor<'a>(
        &self,
        origin: Vec2,
        aim: Vec2,
        anchors: &'a [AnchorCandidate],
    ) -> Option<&'a AnchorCandidate> {
        let mut best: Option<(&AnchorCandidate, f32)> = None;

        let in_probe_range = anchors
            .iter()
            .filter(|a| a.position.distance(origin) <= self.tuning.max_probe_distance)
            .take(self.tuning.max_anchor_candidates);

        for candidate in in_probe_range {
            let offset = candidate.position - origin;
            let distance_sq = offset.length_squared();
            let distance = distance_sq.sqrt();
            if distance > candidate.magnet_radius || distance_sq < 0.0001 {
                continue;
            }
            let alignment = aim.dot(offset / distance);
            if alignment < candidate.min_alignment {
                continue;
            }
            let score = candidate.score(alignment, distance);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    fn attach(&mut self, anchor: Vec2, entity: Option<Entity>, distance: f32, out: &mut Outbox) {
        self.attached = true;
        self.anchor = anchor;
        self.anchor_entity = entity;
        self.rope_length = distance.clamp(self.tuning.min_rope_length, self.tuning.max_rope_length);
        debug!(
            "Swing attached: anchor={:?}, rope_length={:.2}",
            anchor, self.rope_length
        );
        out.event(CharacterEventKind::SwingAttached {
            anchor,
            rope_length: self.rope_length,
        });
        out.cue(Cue::Rope { on: true });
    }

    /// Drop the rope. Safe to call while detached.
    pub fn release(&mut self, with_cooldown: bool, out: &mut Outbox) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.anchor_entity = None;
        self.cooldown = if with_cooldown {
            self.tuning.reattach_delay
        } else {
            0.0
        };
        debug!("Swing released: cooldown={:.2}", self.cooldown);
        out.event(CharacterEventKind::SwingReleased);
        out.cue(Cue::Rope { on: false });
    }

    /// Physics phase: tangential pump from horizontal input and rope reel
    /// from vertical input.
    pub fn apply_pump(&mut self, body: &mut BodyState, axis: Vec2, dt: f32, mass: f32) {
        if !self.attached {
            return;
        }
        let radial = body.position - self.anchor;

        if axis.x.abs() > AXIS_EPSILON {
            let tangent = Vec2::new(-radial.y, radial.x).normalize_or_zero();
            body.velocity += tangent * axis.x.signum() * self.tuning.pump_force / mass * dt;
        }

        if axis.y.abs() > AXIS_EPSILON {
            let desired = (self.rope_length - axis.y * self.tuning.rope_reel_speed * dt)
                .clamp(self.tuning.min_rope_length, self.tuning.max_rope_length);
            let t = (self.tuning.rope_length_lerp_speed * dt).min(1.0);
            self.rope_length += (desired - self.rope_length) * t;
        }
    }

    /// Pin the body to the rope circle and drop the radial velocity.
    pub fn apply_constraint(&self, body: &mut BodyState) {
        if !self.attached {
            return;
        }
        let Some(normal) = (body.position - self.anchor).try_normalize() else {
            return;
        };
        body.position = self.anchor + normal * self.rope_length;
        body.velocity -= normal * body.velocity.dot(normal);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}
