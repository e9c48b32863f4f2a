//! Mechanics domain: level props that react to the character's umbrella.

use bevy::prelude::*;

use crate::movement::move_towards;

/// Ease-in-out from 0 to 1 with flat ends.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

// ============================================================================
// Attack step driver
// ============================================================================

/// Counts umbrella attacks landing near it and raises its entity's local Y
/// one step per attack.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct AttackStepDriver {
    max_steps: u32,
    event_threshold: u32,
    pub min_y: f32,
    pub max_y: f32,
    pub smooth: bool,
    pub lerp_speed: f32,
    /// Steps lost per second; zero disables decay.
    pub decay_per_second: f32,
    /// Idle seconds before progress drops to zero; zero disables.
    pub auto_reset_after: f32,
    /// Attacks count only within this distance of the driver.
    pub reach: f32,
    steps: f32,
    idle: f32,
    threshold_fired: bool,
}

impl Default for AttackStepDriver {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

impl AttackStepDriver {
    /// The threshold is clamped into `[1, max(1, max_steps)]`.
    pub fn new(max_steps: u32, event_threshold: u32) -> Self {
        Self {
            max_steps,
            event_threshold: event_threshold.clamp(1, max_steps.max(1)),
            min_y: 0.0,
            max_y: 5.0,
            smooth: true,
            lerp_speed: 10.0,
            decay_per_second: 0.0,
            auto_reset_after: 0.0,
            reach: 3.0,
            steps: 0.0,
            idle: 0.0,
            threshold_fired: false,
        }
    }

    pub fn with_range(mut self, min_y: f32, max_y: f32) -> Self {
        self.min_y = min_y;
        self.max_y = max_y;
        self
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn event_threshold(&self) -> u32 {
        self.event_threshold
    }

    pub fn steps(&self) -> f32 {
        self.steps
    }

    pub fn rounded_steps(&self) -> u32 {
        self.steps.round() as u32
    }

    /// Progress in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        (self.steps / self.max_steps.max(1) as f32).clamp(0.0, 1.0)
    }

    pub fn target_y(&self) -> f32 {
        self.min_y + (self.max_y - self.min_y) * self.fraction()
    }

    /// Count one attack. Returns true exactly when the threshold is
    /// reached for the first time since it was last re-armed.
    pub fn increment(&mut self) -> bool {
        self.idle = 0.0;
        self.steps = (self.steps + 1.0).min(self.max_steps as f32);

        if !self.threshold_fired && self.steps >= self.event_threshold as f32 {
            self.threshold_fired = true;
            return true;
        }
        false
    }

    /// Advance timers and return the new local Y for `current_y`.
    pub fn advance(&mut self, dt: f32, current_y: f32) -> f32 {
        self.idle += dt;

        if self.decay_per_second > 0.0 && self.steps > 0.0 {
            self.steps = (self.steps - self.decay_per_second * dt).max(0.0);
        }
        if self.auto_reset_after > 0.0 && self.idle >= self.auto_reset_after {
            self.steps = 0.0;
        }
        if self.steps < self.event_threshold as f32 {
            self.threshold_fired = false;
        }

        let target = self.target_y();
        if self.smooth {
            let t = 1.0 - (-self.lerp_speed * dt).exp();
            current_y + (target - current_y) * t
        } else {
            target
        }
    }

    pub fn reset_progress(&mut self) {
        self.steps = 0.0;
        self.idle = 0.0;
        self.threshold_fired = false;
    }
}

// ============================================================================
// Threshold rise mover
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum RiseTarget {
    /// Rise to this Y.
    Absolute(f32),
    /// Rise by this much from where the rise starts.
    Relative(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum RisePhase {
    #[default]
    Idle,
    Waiting {
        remaining: f32,
    },
    Rising {
        start_y: f32,
        goal_y: f32,
        elapsed: f32,
    },
}

/// Moves its entity up once a source step driver reaches its threshold.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct ThresholdRiseMover {
    pub source: Entity,
    pub delay: f32,
    pub rise_duration: f32,
    pub target: RiseTarget,
    pub restart_if_retriggered: bool,
    phase: RisePhase,
}

impl ThresholdRiseMover {
    pub fn new(source: Entity, target: RiseTarget) -> Self {
        Self {
            source,
            delay: 1.0,
            rise_duration: 0.8,
            target,
            restart_if_retriggered: true,
            phase: RisePhase::Idle,
        }
    }

    pub fn phase(&self) -> RisePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != RisePhase::Idle
    }

    /// Start the delay. A running rise is restarted only when configured.
    pub fn trigger(&mut self) -> bool {
        if self.is_busy() && !self.restart_if_retriggered {
            return false;
        }
        self.phase = RisePhase::Waiting {
            remaining: self.delay.max(0.0),
        };
        true
    }

    /// Advance the timer; returns the Y to apply while rising.
    pub fn advance(&mut self, dt: f32, current_y: f32) -> Option<f32> {
        match self.phase {
            RisePhase::Idle => None,
            RisePhase::Waiting { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = RisePhase::Waiting { remaining };
                    return None;
                }
                let goal_y = match self.target {
                    RiseTarget::Absolute(y) => y,
                    RiseTarget::Relative(dy) => current_y + dy,
                };
                self.phase = RisePhase::Rising {
                    start_y: current_y,
                    goal_y,
                    elapsed: 0.0,
                };
                Some(current_y)
            }
            RisePhase::Rising {
                start_y,
                goal_y,
                elapsed,
            } => {
                let duration = self.rise_duration.max(0.0001);
                let elapsed = elapsed + dt;
                if elapsed >= duration {
                    self.phase = RisePhase::Idle;
                    return Some(goal_y);
                }
                self.phase = RisePhase::Rising {
                    start_y,
                    goal_y,
                    elapsed,
                };
                let k = ease_in_out(elapsed / duration);
                Some(start_y + (goal_y - start_y) * k)
            }
        }
    }
}

// ============================================================================
// Down pose gate
// ============================================================================

/// Terrain that only holds while the character touches it in down pose.
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
pub struct DownPoseGate {
    pub delay: f32,
    /// Despawn instead of disabling.
    pub despawn: bool,
    pending: Option<f32>,
}

impl DownPoseGate {
    pub fn with_delay(delay: f32) -> Self {
        Self {
            delay,
            ..default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a touch. Arms the gate when the pose is not active; returns
    /// true when that happened on this touch.
    pub fn touched(&mut self, down_pose_active: bool) -> bool {
        if self.pending.is_some() || down_pose_active {
            return false;
        }
        self.pending = Some(self.delay.max(0.0));
        true
    }

    /// Returns true on the step the gate should switch off.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.pending else {
            return false;
        };
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            self.pending = None;
            return true;
        }
        self.pending = Some(remaining);
        false
    }
}

// ============================================================================
// Water stream
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum PushMode {
    /// One shove on first contact.
    #[default]
    Impulse,
    /// Steady push while overlapping.
    Force,
}

/// Per-instance stream tunables, handed from spawner to stream.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct StreamTuning {
    pub flow_direction: Vec2,
    pub flow_speed: f32,
    /// Scale lost per second while an open umbrella blocks the stream.
    pub shrink_speed: f32,
    /// Scale regained per second while unblocked.
    pub recover_speed: f32,
    pub min_scale: f32,
    pub despawn_distance: f32,
    pub push_strength: f32,
    pub push_mode: PushMode,
    /// Seconds of ignored move input after a hit.
    pub ignore_input: f32,
}

impl Default for StreamTuning {
    fn default() -> Self {
        Self {
            flow_direction: Vec2::X,
            flow_speed: 5.0,
            shrink_speed: 2.0,
            recover_speed: 1.0,
            min_scale: 0.1,
            despawn_distance: 20.0,
            push_strength: 10.0,
            push_mode: PushMode::Impulse,
            ignore_input: 0.15,
        }
    }
}

/// What a stream does to the character it reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamContact {
    /// The open umbrella takes the water.
    Blocked,
    /// The stream stops a dash dead instead of pushing.
    HaltDash { ignore_input: f32 },
    /// Velocity is dropped and replaced by `impulse` (zero in force mode).
    Push { impulse: Vec2, ignore_input: f32 },
}

/// Outcome of one stream step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamStep {
    Flowing { position: Vec2, scale: f32 },
    Spent,
}

/// A travelling jet of water that shoves the character along its flow.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct WaterStream {
    pub tuning: StreamTuning,
    origin: Vec2,
    scale: f32,
    blocked: bool,
    contacts: Vec<Entity>,
}

impl WaterStream {
    pub fn new(tuning: StreamTuning, origin: Vec2) -> Self {
        Self {
            tuning,
            origin,
            scale: 1.0,
            blocked: false,
            contacts: Vec::new(),
        }
    }

    pub fn flow(&self) -> Vec2 {
        self.tuning.flow_direction.normalize_or_zero()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn contacts(&self) -> &[Entity] {
        &self.contacts
    }

    /// Register a new overlap. Returns false when it was already known.
    pub fn begin_contact(&mut self, entity: Entity) -> bool {
        if self.contacts.contains(&entity) {
            return false;
        }
        self.contacts.push(entity);
        true
    }

    pub fn end_contact(&mut self, entity: Entity) {
        self.contacts.retain(|e| *e != entity);
    }

    /// Held back by an umbrella for this step.
    pub fn mark_blocked(&mut self) {
        self.blocked = true;
    }

    /// Decide the effect of reaching a character.
    pub fn contact(&self, umbrella_open: bool, dashing: bool) -> StreamContact {
        if umbrella_open {
            StreamContact::Blocked
        } else if dashing {
            StreamContact::HaltDash {
                ignore_input: self.tuning.ignore_input * 2.0,
            }
        } else {
            let impulse = match self.tuning.push_mode {
                PushMode::Impulse => self.flow() * self.tuning.push_strength,
                PushMode::Force => Vec2::ZERO,
            };
            StreamContact::Push {
                impulse,
                ignore_input: self.tuning.ignore_input,
            }
        }
    }

    /// Steady force on overlapping characters, force mode only.
    pub fn steady_force(&self) -> Option<Vec2> {
        (self.tuning.push_mode == PushMode::Force)
            .then(|| self.flow() * self.tuning.push_strength)
    }

    /// Travel, then shrink or recover. The block flag lasts one step.
    pub fn advance(&mut self, dt: f32, position: Vec2) -> StreamStep {
        let position = position + self.flow() * self.tuning.flow_speed * dt;
        let min_scale = self.tuning.min_scale.max(f32::EPSILON);

        if self.blocked {
            self.scale = (self.scale - self.tuning.shrink_speed * dt).max(min_scale);
        } else {
            self.scale = (self.scale + self.tuning.recover_speed * dt).min(1.0);
        }
        let shrunk_away = self.blocked && self.scale <= min_scale;
        self.blocked = false;

        if shrunk_away || position.distance(self.origin) > self.tuning.despawn_distance {
            return StreamStep::Spent;
        }
        StreamStep::Flowing {
            position,
            scale: self.scale,
        }
    }
}

/// Emits water streams at a fixed interval.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct WaterStreamSpawner {
    pub interval: f32,
    pub active: bool,
    /// Collider and sprite size of each stream at full scale.
    pub size: Vec2,
    pub stream: StreamTuning,
    timer: f32,
}

impl Default for WaterStreamSpawner {
    fn default() -> Self {
        Self::new(StreamTuning::default())
    }
}

impl WaterStreamSpawner {
    pub fn new(stream: StreamTuning) -> Self {
        Self {
            interval: 0.2,
            active: true,
            size: Vec2::new(0.6, 0.3),
            stream,
            timer: 0.0,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// Returns true when a stream should be spawned this step.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer = 0.0;
            return true;
        }
        false
    }

    /// A fresh stream carrying this spawner's tunables.
    pub fn spawn_stream(&self, origin: Vec2) -> WaterStream {
        WaterStream::new(self.stream.clone(), origin)
    }
}

// ============================================================================
// Platform riser
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum RiseMotion {
    /// Constant speed.
    #[default]
    Linear,
    /// Exponential approach, snapping when close.
    Smooth,
}

/// Distance at which a smooth rise snaps onto its target.
const RISER_SNAP: f32 = 0.05;

/// A platform that lifts the character after they stand on it a while.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
pub struct PlatformRiser {
    pub rise_to: f32,
    pub speed: f32,
    pub motion: RiseMotion,
    pub delay: f32,
    pub return_when_left: bool,
    home_y: f32,
    target_y: f32,
    occupied: bool,
    occupied_for: f32,
}

impl PlatformRiser {
    pub fn new(home_y: f32, rise_to: f32) -> Self {
        Self {
            rise_to,
            speed: 2.0,
            motion: RiseMotion::Linear,
            delay: 1.0,
            return_when_left: true,
            home_y,
            target_y: home_y,
            occupied: false,
            occupied_for: 0.0,
        }
    }

    pub fn home_y(&self) -> f32 {
        self.home_y
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn stepped_on(&mut self) {
        self.occupied = true;
        self.occupied_for = 0.0;
    }

    pub fn stepped_off(&mut self) {
        self.occupied = false;
    }

    /// Advance timers and return the new local Y for `current_y`.
    pub fn advance(&mut self, dt: f32, current_y: f32) -> f32 {
        if self.occupied {
            self.occupied_for += dt;
            if self.occupied_for >= self.delay {
                self.target_y = self.rise_to;
            }
        } else if self.return_when_left {
            self.target_y = self.home_y;
        }

        match self.motion {
            RiseMotion::Linear => move_towards(current_y, self.target_y, self.speed * dt),
            RiseMotion::Smooth => {
                let t = 1.0 - (-self.speed * dt).exp();
                let y = current_y + (self.target_y - current_y) * t;
                if (y - self.target_y).abs() < RISER_SNAP {
                    self.target_y
                } else {
                    y
                }
            }
        }
    }

    /// Back to the home height with nobody aboard. Returns that height.
    pub fn reset(&mut self) -> f32 {
        self.target_y = self.home_y;
        self.occupied = false;
        self.occupied_for = 0.0;
        self.home_y
    }
}
