//! Movement domain: umbrella dash phases and force curve.

use bevy::prelude::*;

use crate::content::UmbrellaTuning;
use crate::movement::components::BodyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashPhase {
    #[default]
    Inactive,
    /// Animation lead-in; no physics yet.
    WindUp,
    Active,
}

/// Outcome of one physics step of the dash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashStep {
    Idle,
    WindingUp,
    Launched,
    Pushing,
    Finished,
}

/// Ease-in-out curve from 1.0 at `t = 0` down to `end` at `t = 1`, with
/// flat tangents at both ends.
pub fn dash_force_curve(t: f32, end: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let s = t * t * (3.0 - 2.0 * t);
    1.0 + (end - 1.0) * s
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashState {
    pub phase: DashPhase,
    pub elapsed: f32,
    /// Unit lateral direction, or zero for a purely vertical dash.
    pub direction: Vec2,
    pub forced_upward: bool,
    pub started_grounded: bool,
}

impl DashState {
    pub fn start(direction: Vec2, forced_upward: bool, started_grounded: bool) -> Self {
        Self {
            phase: DashPhase::WindUp,
            elapsed: 0.0,
            direction,
            forced_upward,
            started_grounded,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != DashPhase::Inactive
    }

    fn impulse_direction(&self) -> Vec2 {
        let has_lateral = self.direction != Vec2::ZERO;
        match (self.forced_upward, has_lateral) {
            (true, true) => (self.direction + Vec2::Y).normalize_or(Vec2::Y),
            (true, false) => Vec2::Y,
            (false, true) => self.direction,
            (false, false) => Vec2::X,
        }
    }

    /// Advance one physics step. The impulse lands once on the wind-up to
    /// active transition; afterwards a curve-shaped force pushes until the
    /// duration runs out.
    pub fn step(
        &mut self,
        body: &mut BodyState,
        dt: f32,
        mass: f32,
        tuning: &UmbrellaTuning,
    ) -> DashStep {
        if !self.is_active() {
            return DashStep::Idle;
        }
        self.elapsed += dt;

        if self.phase == DashPhase::WindUp {
            if self.elapsed < tuning.dash_wind_up {
                return DashStep::WindingUp;
            }
            self.phase = DashPhase::Active;
            if tuning.dash_initial_impulse > 0.0 {
                body.velocity += self.impulse_direction() * tuning.dash_initial_impulse / mass;
            }
            return DashStep::Launched;
        }

        let active_time = self.elapsed - tuning.dash_wind_up;
        let t = if tuning.dash_duration <= 0.0 {
            1.0
        } else {
            (active_time / tuning.dash_duration).clamp(0.0, 1.0)
        };
        let curve = dash_force_curve(t, tuning.dash_curve_end);

        if self.direction != Vec2::ZERO {
            let lateral = self.direction * tuning.dash_force_magnitude * curve;
            body.velocity += lateral / mass * dt;
        }
        if self.forced_upward {
            let base = if self.started_grounded {
                tuning.grounded_upward_dash_force
            } else {
                tuning.aerial_upward_dash_force
            };
            let upward = base * curve;
            if upward > 0.0 {
                body.velocity.y += upward / mass * dt;
            }
        }
        clamp_dash_velocity(body, tuning.dash_velocity_clamp);

        if self.elapsed >= tuning.dash_wind_up + tuning.dash_duration {
            *self = Self::default();
            return DashStep::Finished;
        }
        DashStep::Pushing
    }
}

/// Bound the velocity magnitude. Non-positive `limit` disables the clamp.
pub fn clamp_dash_velocity(body: &mut BodyState, limit: f32) {
    if limit > 0.0 {
        body.velocity = body.velocity.clamp_length_max(limit);
    }
}
