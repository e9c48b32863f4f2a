//! Movement domain: controller drivers, command handling and publishing.
//!
//! The decision driver runs in `Update`, the physics driver in
//! `FixedUpdate`. Both copy avian's position and velocity into a
//! `BodyState`, run the controller and copy the result back.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::MovementLimiter;
use crate::movement::{
    AbilityState, AbilityTint, AnchorCandidate, AnchorProbe, AnimationCue, CharacterBody,
    CharacterCommand, CharacterController, CharacterEvent, GameLayer, HookRail, InputSnapshot,
    Player, ProbeHit, RailPath, Senses, Surroundings, SwingAnchor,
};

/// Fallback swing probe backed by an avian shape cast.
struct SpatialAnchorProbe<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    filter: SpatialQueryFilter,
}

impl AnchorProbe for SpatialAnchorProbe<'_, '_, '_> {
    fn cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        radius: f32,
    ) -> Option<ProbeHit> {
        let direction = Dir2::new(direction).ok()?;
        self.spatial_query
            .cast_shape(
                &Collider::circle(radius),
                origin,
                0.0,
                direction,
                &ShapeCastConfig::from_max_distance(max_distance),
                &self.filter,
            )
            .map(|hit| ProbeHit {
                point: hit.point1,
                distance: hit.distance,
                entity: Some(hit.entity),
            })
    }
}

#[allow(clippy::type_complexity)]
pub(crate) fn run_decision_phase(
    time: Res<Time>,
    limiter: Res<MovementLimiter>,
    spatial_query: SpatialQuery,
    anchor_query: Query<(Entity, &GlobalTransform, &SwingAnchor)>,
    rail_query: Query<(Entity, &GlobalTransform, &HookRail)>,
    mut players: Query<
        (
            Entity,
            &mut CharacterController,
            Option<&mut InputSnapshot>,
            &Senses,
            &mut CharacterBody,
            &mut Position,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    let anchors: Vec<AnchorCandidate> = anchor_query
        .iter()
        .map(|(entity, transform, anchor)| AnchorCandidate {
            entity: Some(entity),
            position: transform.translation().truncate(),
            magnet_radius: anchor.magnet_radius,
            min_alignment: anchor.min_alignment,
            priority_boost: anchor.priority_boost,
        })
        .collect();
    let rails: Vec<RailPath> = rail_query
        .iter()
        .map(|(entity, transform, rail)| {
            RailPath::from_rail(entity, rail, transform.translation().truncate())
        })
        .collect();

    for (entity, mut controller, mut input, senses, mut character_body, mut position, mut velocity) in
        &mut players
    {
        let probe = SpatialAnchorProbe {
            spatial_query: &spatial_query,
            filter: SpatialQueryFilter::from_mask([GameLayer::Ground, GameLayer::Anchor])
                .with_excluded_entities([entity]),
        };
        let surroundings = Surroundings {
            grounded: senses.grounded,
            tip_touching: senses.tip_touching,
            anchors: &anchors,
            rails: &rails,
            probe: &probe,
        };

        let mut body = character_body.state(position.0, velocity.0);
        controller.tick(
            dt,
            input.as_deref_mut(),
            limiter.can_move(),
            &mut body,
            &surroundings,
        );
        character_body.store(&body);
        position.0 = body.position;
        velocity.0 = body.velocity;
    }
}

pub(crate) fn run_physics_phase(
    time: Res<Time>,
    mut players: Query<
        (
            &mut CharacterController,
            &mut CharacterBody,
            &mut Position,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (mut controller, mut character_body, mut position, mut velocity) in &mut players {
        let mut body = character_body.state(position.0, velocity.0);
        controller.fixed_tick(dt, &mut body);
        character_body.store(&body);
        if position.0 != body.position {
            position.0 = body.position;
        }
        velocity.0 = body.velocity;
    }
}

/// Apply imperative requests from other systems to every player.
pub(crate) fn apply_character_commands(
    mut requests: MessageReader<CharacterCommand>,
    mut players: Query<
        (
            &mut CharacterController,
            &mut CharacterBody,
            &mut Position,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    for command in requests.read() {
        for (mut controller, mut character_body, mut position, mut velocity) in &mut players {
            let mut body = character_body.state(position.0, velocity.0);
            let refused = match *command {
                CharacterCommand::ForceCloseUmbrella => {
                    controller.force_close_umbrella();
                    None
                }
                CharacterCommand::ForceStopHook => {
                    controller.force_stop_hook(&mut body);
                    None
                }
                CharacterCommand::ReleaseSwing { immediate } => {
                    controller.release_swing(immediate);
                    None
                }
                CharacterCommand::IgnoreInput { duration } => {
                    controller.ignore_input_for(duration);
                    None
                }
                CharacterCommand::TryStartDash => controller.try_start_dash(&mut body).err(),
                CharacterCommand::TryTriggerAttack => controller.try_trigger_attack().err(),
                CharacterCommand::BeginDownPose => controller.begin_down_pose(&mut body).err(),
                CharacterCommand::EndDownPose => {
                    controller.end_down_pose();
                    None
                }
                CharacterCommand::Reset => {
                    controller.reset(&mut body);
                    None
                }
            };
            if let Some(error) = refused {
                debug!("Command {:?} refused: {}", command, error);
            }
            character_body.store(&body);
            position.0 = body.position;
            velocity.0 = body.velocity;
        }
    }
}

/// Drain each controller's outbox into messages, once per frame.
pub(crate) fn publish_character_events(
    mut players: Query<(Entity, &mut CharacterController), With<Player>>,
    mut events: MessageWriter<CharacterEvent>,
    mut cues: MessageWriter<AnimationCue>,
) {
    for (entity, mut controller) in &mut players {
        if controller.outbox().is_empty() {
            continue;
        }
        let outbox = controller.drain();
        for kind in outbox.events {
            events.write(CharacterEvent { entity, kind });
        }
        for cue in outbox.cues {
            cues.write(AnimationCue { entity, cue });
        }
    }
}

/// Sprite flip and per-ability tint.
pub(crate) fn update_presentation(
    mut players: Query<
        (&CharacterController, &CharacterBody, &AbilityTint, &mut Sprite),
        With<Player>,
    >,
) {
    for (controller, character_body, tint, mut sprite) in &mut players {
        sprite.flip_x = character_body.facing.sign() < 0.0;

        let color = if controller.is_hooking() {
            Color::srgb(0.95, 0.75, 0.3)
        } else if controller.is_swinging() {
            Color::srgb(0.6, 0.9, 0.6)
        } else {
            match controller.ability_state() {
                AbilityState::Idle => tint.base,
                AbilityState::Glide => Color::srgb(0.6, 0.8, 1.0),
                AbilityState::Attack => Color::srgb(1.0, 0.5, 0.5),
                AbilityState::Dash => Color::srgb(1.0, 1.0, 0.6),
                AbilityState::DownPose => Color::srgb(0.75, 0.6, 0.95),
            }
        };
        if sprite.color != color {
            sprite.color = color;
        }
    }
}
