//! Mechanics domain: systems driving step drivers, rise movers, gates,
//! water streams and platform risers.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::mechanics::components::{
    AttackStepDriver, DownPoseGate, PlatformRiser, StreamContact, StreamStep, ThresholdRiseMover,
    WaterStream, WaterStreamSpawner,
};
use crate::mechanics::events::ThresholdReached;
use crate::movement::{
    CharacterBody, CharacterController, CharacterEvent, CharacterEventKind, GameLayer, Player,
};

/// Count umbrella attacks fired within reach of each driver.
pub(crate) fn count_attack_steps(
    mut character_events: MessageReader<CharacterEvent>,
    players: Query<&GlobalTransform, With<Player>>,
    mut drivers: Query<(Entity, &GlobalTransform, &mut AttackStepDriver)>,
    mut threshold_events: MessageWriter<ThresholdReached>,
) {
    for event in character_events.read() {
        if event.kind != CharacterEventKind::AttackFired {
            continue;
        }
        let Ok(player_transform) = players.get(event.entity) else {
            continue;
        };
        let attacker = player_transform.translation().truncate();

        for (entity, transform, mut driver) in &mut drivers {
            let at = transform.translation().truncate();
            if at.distance(attacker) > driver.reach {
                continue;
            }
            let reached = driver.increment();
            debug!(
                "Attack step {:?}: steps={}/{}",
                entity,
                driver.rounded_steps(),
                driver.max_steps()
            );
            if reached {
                info!("Step driver {:?} reached its threshold", entity);
                threshold_events.write(ThresholdReached { driver: entity });
            }
        }
    }
}

pub(crate) fn drive_attack_steps(
    time: Res<Time>,
    mut drivers: Query<(&mut AttackStepDriver, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut driver, mut transform) in &mut drivers {
        let y = driver.advance(dt, transform.translation.y);
        if transform.translation.y != y {
            transform.translation.y = y;
        }
    }
}

pub(crate) fn trigger_rise_movers(
    mut threshold_events: MessageReader<ThresholdReached>,
    mut movers: Query<(Entity, &mut ThresholdRiseMover)>,
) {
    for event in threshold_events.read() {
        for (entity, mut mover) in &mut movers {
            if mover.source == event.driver && mover.trigger() {
                debug!("Rise mover {:?} triggered by {:?}", entity, event.driver);
            }
        }
    }
}

pub(crate) fn drive_rise_movers(
    time: Res<Time>,
    mut movers: Query<(&mut ThresholdRiseMover, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut mover, mut transform) in &mut movers {
        if let Some(y) = mover.advance(dt, transform.translation.y) {
            transform.translation.y = y;
        }
    }
}

pub(crate) fn check_down_pose_gates(
    mut collision_start_events: MessageReader<CollisionStart>,
    mut gates: Query<&mut DownPoseGate>,
    players: Query<&CharacterController, With<Player>>,
) {
    for event in collision_start_events.read() {
        let (gate_entity, other) = if gates.contains(event.collider1) {
            (event.collider1, event.collider2)
        } else if gates.contains(event.collider2) {
            (event.collider2, event.collider1)
        } else {
            continue;
        };

        let (Ok(mut gate), Ok(controller)) = (gates.get_mut(gate_entity), players.get(other))
        else {
            continue;
        };
        let down_pose = controller.umbrella().is_down_pose();
        if gate.touched(down_pose) {
            debug!("Gate {:?} touched without down pose", gate_entity);
        }
    }
}

pub(crate) fn tick_down_pose_gates(
    mut commands: Commands,
    time: Res<Time>,
    mut gates: Query<(Entity, &mut DownPoseGate)>,
) {
    let dt = time.delta_secs();
    for (entity, mut gate) in &mut gates {
        if !gate.advance(dt) {
            continue;
        }
        info!("Gate {:?} gave way", entity);
        if gate.despawn {
            commands.entity(entity).despawn();
        } else {
            commands
                .entity(entity)
                .insert((ColliderDisabled, Visibility::Hidden))
                .remove::<DownPoseGate>();
        }
    }
}

// ============================================================================
// Water streams
// ============================================================================

pub(crate) fn spawn_water_streams(
    mut commands: Commands,
    time: Res<Time>,
    mut spawners: Query<(&GlobalTransform, &mut WaterStreamSpawner)>,
) {
    let dt = time.delta_secs();
    for (transform, mut spawner) in &mut spawners {
        if !spawner.tick(dt) {
            continue;
        }
        let origin = transform.translation().truncate();
        let size = spawner.size;
        commands.spawn((
            spawner.spawn_stream(origin),
            Sprite {
                color: Color::srgba(0.3, 0.55, 0.95, 0.8),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(origin.extend(0.0)),
            RigidBody::Kinematic,
            Collider::rectangle(size.x, size.y),
            Sensor,
            CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player]),
        ));
    }
}

/// First contact with a character: block, halt a dash or shove.
#[allow(clippy::type_complexity)]
pub(crate) fn hit_by_water_streams(
    mut collision_start_events: MessageReader<CollisionStart>,
    mut collision_end_events: MessageReader<CollisionEnd>,
    mut streams: Query<&mut WaterStream>,
    mut players: Query<
        (
            &mut CharacterController,
            &mut CharacterBody,
            &Position,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    for event in collision_end_events.read() {
        for (stream_entity, other) in [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ] {
            if let Ok(mut stream) = streams.get_mut(stream_entity) {
                stream.end_contact(other);
            }
        }
    }

    for event in collision_start_events.read() {
        let (stream_entity, other) = if streams.contains(event.collider1) {
            (event.collider1, event.collider2)
        } else if streams.contains(event.collider2) {
            (event.collider2, event.collider1)
        } else {
            continue;
        };
        let (Ok(mut stream), Ok((mut controller, mut character_body, position, mut velocity))) =
            (streams.get_mut(stream_entity), players.get_mut(other))
        else {
            continue;
        };
        if !stream.begin_contact(other) {
            continue;
        }

        let mut body = character_body.state(position.0, velocity.0);
        match stream.contact(controller.is_umbrella_open(), controller.is_dash_active()) {
            StreamContact::Blocked => {
                debug!("Stream {:?} blocked by umbrella", stream_entity);
                stream.mark_blocked();
            }
            StreamContact::HaltDash { ignore_input } => {
                info!("Stream {:?} halted a dash", stream_entity);
                controller.halt_dash(&mut body);
                controller.ignore_input_for(ignore_input);
            }
            StreamContact::Push {
                impulse,
                ignore_input,
            } => {
                debug!("Stream {:?} pushed {:?}", stream_entity, other);
                controller.knock_back(&mut body, impulse, ignore_input);
            }
        }
        character_body.store(&body);
        velocity.0 = body.velocity;
    }
}

/// Ongoing overlap: umbrellas keep blocking, force-mode streams keep pushing.
#[allow(clippy::type_complexity)]
pub(crate) fn press_water_streams(
    time: Res<Time>,
    mut streams: Query<&mut WaterStream>,
    mut players: Query<
        (
            &mut CharacterController,
            &CharacterBody,
            &Position,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();
    for mut stream in &mut streams {
        let mut blocked = false;
        for &entity in stream.contacts() {
            let Ok((mut controller, character_body, position, mut velocity)) =
                players.get_mut(entity)
            else {
                continue;
            };
            if controller.is_umbrella_open() {
                blocked = true;
                continue;
            }
            if let Some(force) = stream.steady_force() {
                let mut body = character_body.state(position.0, velocity.0);
                controller.push(&mut body, force, dt);
                velocity.0 = body.velocity;
            }
        }
        if blocked {
            stream.mark_blocked();
        }
    }
}

pub(crate) fn drive_water_streams(
    mut commands: Commands,
    time: Res<Time>,
    mut streams: Query<(Entity, &mut WaterStream, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut stream, mut transform) in &mut streams {
        match stream.advance(dt, transform.translation.truncate()) {
            StreamStep::Flowing { position, scale } => {
                transform.translation.x = position.x;
                transform.translation.y = position.y;
                if transform.scale.x != scale {
                    transform.scale = Vec3::new(scale, scale, 1.0);
                }
            }
            StreamStep::Spent => {
                debug!("Stream {:?} spent", entity);
                commands.entity(entity).despawn();
            }
        }
    }
}

// ============================================================================
// Platform risers
// ============================================================================

pub(crate) fn track_platform_riders(
    mut collision_start_events: MessageReader<CollisionStart>,
    mut collision_end_events: MessageReader<CollisionEnd>,
    mut risers: Query<&mut PlatformRiser>,
    players: Query<(), With<Player>>,
) {
    for event in collision_start_events.read() {
        for (riser_entity, other) in [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ] {
            if !players.contains(other) {
                continue;
            }
            if let Ok(mut riser) = risers.get_mut(riser_entity) {
                debug!("Player stepped on riser {:?}", riser_entity);
                riser.stepped_on();
            }
        }
    }

    for event in collision_end_events.read() {
        for (riser_entity, other) in [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ] {
            if !players.contains(other) {
                continue;
            }
            if let Ok(mut riser) = risers.get_mut(riser_entity) {
                debug!("Player left riser {:?}", riser_entity);
                riser.stepped_off();
            }
        }
    }
}

pub(crate) fn drive_platform_risers(
    time: Res<Time>,
    mut risers: Query<(&mut PlatformRiser, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut riser, mut transform) in &mut risers {
        let y = riser.advance(dt, transform.translation.y);
        if transform.translation.y != y {
            transform.translation.y = y;
        }
    }
}
