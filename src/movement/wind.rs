//! Movement domain: additive force from occupied wind zones.

use bevy::prelude::*;

use crate::content::{WindApplication, WindTuning};
use crate::movement::components::BodyState;

/// Forces below this squared magnitude are not applied.
const MIN_FORCE_SQ: f32 = 0.001;

/// Trigger volume pushing the character while it is inside.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct WindZone {
    pub direction: Vec2,
    pub strength: f32,
    pub airborne_only: bool,
    pub glide_multiplier: f32,
    pub normal_multiplier: f32,
}

impl Default for WindZone {
    fn default() -> Self {
        Self {
            direction: Vec2::X,
            strength: 5.0,
            airborne_only: true,
            glide_multiplier: 1.5,
            normal_multiplier: 1.0,
        }
    }
}

impl WindZone {
    /// Contribution for the given body state; zero when grounded in an
    /// airborne-only zone.
    pub fn force(&self, grounded: bool, gliding: bool) -> Vec2 {
        if self.airborne_only && grounded {
            return Vec2::ZERO;
        }
        let multiplier = if gliding {
            self.glide_multiplier
        } else {
            self.normal_multiplier
        };
        self.direction.normalize_or_zero() * self.strength * multiplier
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindController {
    tuning: WindTuning,
    zones: Vec<(Entity, WindZone)>,
    current_force: Vec2,
}

impl WindController {
    pub fn new(tuning: WindTuning) -> Self {
        Self {
            tuning,
            zones: Vec::new(),
            current_force: Vec2::ZERO,
        }
    }

    pub fn current_force(&self) -> Vec2 {
        self.current_force
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Entering a zone already occupied refreshes its parameters.
    pub fn enter(&mut self, entity: Entity, zone: WindZone) {
        match self.zones.iter_mut().find(|(e, _)| *e == entity) {
            Some(slot) => slot.1 = zone,
            None => self.zones.push((entity, zone)),
        }
    }

    pub fn exit(&mut self, entity: Entity) {
        self.zones.retain(|(e, _)| *e != entity);
    }

    /// Physics phase: smooth toward the summed zone force and push the
    /// body with it.
    pub fn fixed_update(
        &mut self,
        body: &mut BodyState,
        dt: f32,
        mass: f32,
        grounded: bool,
        gliding: bool,
    ) {
        let target: Vec2 = self
            .zones
            .iter()
            .map(|(_, zone)| zone.force(grounded, gliding))
            .sum();

        self.current_force = if self.tuning.smooth {
            let t = (self.tuning.smooth_speed * dt).min(1.0);
            self.current_force.lerp(target, t)
        } else {
            target
        };

        if self.zones.is_empty() || self.current_force.length_squared() <= MIN_FORCE_SQ {
            return;
        }

        match self.tuning.application {
            WindApplication::Force => body.velocity += self.current_force / mass * dt,
            WindApplication::Velocity => body.velocity += self.current_force * dt,
        }
    }

    /// Clear smoothing state but keep occupied zones; the character is
    /// still physically inside them.
    pub fn reset(&mut self) {
        self.current_force = Vec2::ZERO;
    }
}
