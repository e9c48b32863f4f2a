//! Movement domain: discrete notifications raised by the character core.
//!
//! Controllers push into an [`Outbox`] while they run; the publish system
//! drains it once per frame into Bevy messages so each logical trigger is
//! delivered exactly once.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::movement::jump::JumpKind;

/// Gameplay-level transitions other systems may react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterEventKind {
    Jumped { kind: JumpKind, speed: f32 },
    Landed,
    LeftGround,
    GlideOpened,
    GlideClosed,
    AttackFired,
    AttackReleased,
    DashStarted { direction: Vec2, grounded: bool },
    DashEnded,
    BoostJump { speed: f32 },
    DownPoseEntered,
    DownPoseExited,
    SwingAttached { anchor: Vec2, rope_length: f32 },
    SwingReleased,
    HookStarted,
    HookFinished,
}

/// Fire-and-forget visual triggers. Nothing reads a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    UmbrellaSpin { on: bool },
    AttackTrigger,
    AttackSpin { on: bool },
    DashTrigger,
    DashVisual { down: bool },
    DownPose { on: bool },
    Rope { on: bool },
    HookLine { on: bool },
}

/// Pending notifications for one character, drained once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outbox {
    pub events: Vec<CharacterEventKind>,
    pub cues: Vec<Cue>,
}

impl Outbox {
    pub fn event(&mut self, event: CharacterEventKind) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.cues.is_empty()
    }

    pub fn contains(&self, event: &CharacterEventKind) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, predicate: impl Fn(&CharacterEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

/// Event fired for every character state transition
#[derive(Debug, Clone)]
pub struct CharacterEvent {
    pub entity: Entity,
    pub kind: CharacterEventKind,
}

impl Message for CharacterEvent {}

/// Event fired for every visual state change
#[derive(Debug, Clone)]
pub struct AnimationCue {
    pub entity: Entity,
    pub cue: Cue,
}

impl Message for AnimationCue {}

/// Imperative requests from collaborators (cutscenes, hazards, respawn).
/// Applied to every player character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterCommand {
    ForceCloseUmbrella,
    ForceStopHook,
    ReleaseSwing { immediate: bool },
    IgnoreInput { duration: f32 },
    TryStartDash,
    TryTriggerAttack,
    BeginDownPose,
    EndDownPose,
    Reset,
}

impl Message for CharacterCommand {}
