//! Movement domain: rail riding.
//!
//! While attached the hook owns the body's position outright. Progress
//! along the rail is normalized by arc length and advances linearly.

use bevy::prelude::*;

use crate::content::HookTuning;
use crate::movement::components::BodyState;
use crate::movement::events::{CharacterEventKind, Cue, Outbox};
use crate::movement::input::{Button, InputSnapshot};
use crate::movement::umbrella::UmbrellaController;

/// Authored rail: polyline in the owning entity's local space.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct HookRail {
    pub points: Vec<Vec2>,
    pub hookable: bool,
    /// How close the character must be to the rail start to grab it.
    pub detection_radius: f32,
}

impl Default for HookRail {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            hookable: true,
            detection_radius: 3.0,
        }
    }
}

/// A rail resolved into world space for this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RailPath {
    pub entity: Option<Entity>,
    pub points: Vec<Vec2>,
    pub hookable: bool,
    pub detection_radius: f32,
}

impl RailPath {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            entity: None,
            points,
            hookable: true,
            detection_radius: 3.0,
        }
    }

    /// Resolve an authored rail against its world translation.
    pub fn from_rail(entity: Entity, rail: &HookRail, origin: Vec2) -> Self {
        Self {
            entity: Some(entity),
            points: rail.points.iter().map(|p| origin + *p).collect(),
            hookable: rail.hookable,
            detection_radius: rail.detection_radius,
        }
    }

    pub fn start(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    pub fn total_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Point at normalized arc-length `t`. A single point rail always
    /// returns that point; an empty rail returns `None`.
    pub fn position_at(&self, t: f32) -> Option<Vec2> {
        let first = self.start()?;
        let total = self.total_length();
        if self.points.len() < 2 || total <= 0.0 {
            return Some(first);
        }

        let mut remaining = t.clamp(0.0, 1.0) * total;
        for segment in self.points.windows(2) {
            let length = segment[0].distance(segment[1]);
            if remaining <= length {
                if length <= f32::EPSILON {
                    return Some(segment[1]);
                }
                return Some(segment[0].lerp(segment[1], remaining / length));
            }
            remaining -= length;
        }
        self.end()
    }

    /// Distance from `position` to the rail start if it is grabbable from
    /// there.
    pub fn grab_distance(&self, position: Vec2) -> Option<f32> {
        if !self.hookable {
            return None;
        }
        let distance = self.start()?.distance(position);
        (distance <= self.detection_radius).then_some(distance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HookController {
    tuning: HookTuning,
    rail: Option<RailPath>,
    progress: f32,
    saved_gravity_scale: f32,
}

impl HookController {
    pub fn new(tuning: HookTuning) -> Self {
        Self {
            tuning,
            rail: None,
            progress: 0.0,
            saved_gravity_scale: 1.0,
        }
    }

    pub fn is_hooking(&self) -> bool {
        self.rail.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn rail(&self) -> Option<&RailPath> {
        self.rail.as_ref()
    }

    /// Decision phase. Grabs the nearest rail when the action button is
    /// available, then drives the body along the rail.
    pub fn update(
        &mut self,
        dt: f32,
        input: &mut InputSnapshot,
        body: &mut BodyState,
        rails: &[RailPath],
        umbrella: &mut UmbrellaController,
        out: &mut Outbox,
    ) {
        let wants_hook = input.held(Button::Action) || input.peek(Button::Action);
        if !self.is_hooking() && wants_hook {
            if let Some(rail) = nearest_rail(rails, body.position) {
                input.consume(Button::Action);
                umbrella.force_close(out);
                self.attach(rail.clone(), body, out);
            }
        }
        self.advance(dt, body, out);
    }

    fn attach(&mut self, rail: RailPath, body: &mut BodyState, out: &mut Outbox) {
        debug!(
            "Hook attached: rail={:?}, length={:.2}",
            rail.entity,
            rail.total_length()
        );
        self.rail = Some(rail);
        self.progress = 0.0;
        self.saved_gravity_scale = body.gravity_scale;
        if self.tuning.disable_gravity {
            body.gravity_scale = 0.0;
        }
        body.velocity = Vec2::ZERO;
        out.event(CharacterEventKind::HookStarted);
        out.cue(Cue::HookLine { on: true });
    }

    fn advance(&mut self, dt: f32, body: &mut BodyState, out: &mut Outbox) {
        let Some(rail) = &self.rail else {
            return;
        };

        let length = rail.total_length();
        self.progress = if rail.points.len() < 2 || length <= 0.0 {
            1.0
        } else {
            (self.progress + self.tuning.move_speed / length * dt).min(1.0)
        };

        if let Some(point) = rail.position_at(self.progress) {
            body.position = point + Vec2::new(0.0, self.tuning.hang_offset);
        }
        body.velocity = Vec2::ZERO;

        if self.progress >= 1.0 {
            self.finish(body, out);
        }
    }

    fn finish(&mut self, body: &mut BodyState, out: &mut Outbox) {
        self.rail = None;
        self.progress = 0.0;
        body.gravity_scale = self.saved_gravity_scale;
        debug!("Hook finished");
        out.event(CharacterEventKind::HookFinished);
        out.cue(Cue::HookLine { on: false });
    }

    /// Interrupt the ride. Safe to call while idle.
    pub fn force_stop(&mut self, body: &mut BodyState, out: &mut Outbox) {
        if self.is_hooking() {
            self.finish(body, out);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}

/// Grabbable rail whose start is closest to `position`.
pub fn nearest_rail(rails: &[RailPath], position: Vec2) -> Option<&RailPath> {
    rails
        .iter()
        .filter_map(|rail| rail.grab_distance(position).map(|d| (rail, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(rail, _)| rail)
}
