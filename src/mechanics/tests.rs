//! Mechanics domain: tests for step drivers, rise movers, gates, water
//! streams and platform risers.

use std::time::Duration;

use approx::assert_relative_eq;
use avian2d::prelude::ColliderDisabled;
use bevy::prelude::*;

use super::systems::{drive_water_streams, tick_down_pose_gates};
use super::{
    AttackStepDriver, DownPoseGate, PlatformRiser, PushMode, RiseMotion, RisePhase, RiseTarget,
    StreamContact, StreamStep, StreamTuning, ThresholdRiseMover, WaterStream, WaterStreamSpawner,
    ease_in_out,
};

fn source() -> Entity {
    World::new().spawn_empty().id()
}

// -----------------------------------------------------------------------------
// Attack step driver
// -----------------------------------------------------------------------------

#[test]
fn test_threshold_is_clamped_into_step_range() {
    assert_eq!(AttackStepDriver::new(5, 0).event_threshold(), 1);
    assert_eq!(AttackStepDriver::new(5, 9).event_threshold(), 5);
    assert_eq!(AttackStepDriver::new(0, 3).event_threshold(), 1);
}

#[test]
fn test_threshold_fires_once_until_rearmed() {
    let mut driver = AttackStepDriver::new(5, 3);
    driver.decay_per_second = 1.0;

    let fired: Vec<bool> = (0..6).map(|_| driver.increment()).collect();
    assert_eq!(fired, vec![false, false, true, false, false, false]);
    assert_eq!(driver.rounded_steps(), 5);

    // Decay below the threshold re-arms it
    driver.advance(2.5, 0.0);
    assert_relative_eq!(driver.steps(), 2.5);
    assert!(driver.increment());
}

#[test]
fn test_target_height_follows_progress() {
    let mut driver = AttackStepDriver::new(5, 5).with_range(-1.0, 1.5);
    driver.smooth = false;
    driver.increment();
    driver.increment();

    assert_relative_eq!(driver.fraction(), 0.4);
    assert_relative_eq!(driver.advance(0.0, 3.0), 0.0);
}

#[test]
fn test_smoothing_is_frame_rate_independent() {
    let mut driver = AttackStepDriver::new(5, 5);
    for _ in 0..5 {
        driver.increment();
    }

    let y = driver.advance(0.1, 0.0);
    assert_relative_eq!(y, 5.0 * (1.0 - (-1.0f32).exp()), epsilon = 1e-4);

    let mut split = AttackStepDriver::new(5, 5);
    for _ in 0..5 {
        split.increment();
    }
    let half = split.advance(0.05, 0.0);
    assert_relative_eq!(split.advance(0.05, half), y, epsilon = 1e-4);
}

#[test]
fn test_auto_reset_after_idle() {
    let mut driver = AttackStepDriver::new(5, 5);
    driver.auto_reset_after = 2.0;
    driver.increment();

    driver.advance(1.0, 0.0);
    assert_eq!(driver.rounded_steps(), 1);
    driver.increment();
    driver.advance(1.5, 0.0);
    assert_eq!(driver.rounded_steps(), 2);

    driver.advance(1.0, 0.0);
    assert_eq!(driver.rounded_steps(), 0);
}

#[test]
fn test_reset_progress() {
    let mut driver = AttackStepDriver::new(2, 1);
    assert!(driver.increment());
    driver.reset_progress();
    assert_eq!(driver.steps(), 0.0);
    assert!(driver.increment());
}

// -----------------------------------------------------------------------------
// Threshold rise mover
// -----------------------------------------------------------------------------

#[test]
fn test_ease_in_out_endpoints() {
    assert_eq!(ease_in_out(0.0), 0.0);
    assert_eq!(ease_in_out(0.5), 0.5);
    assert_eq!(ease_in_out(1.0), 1.0);
    assert_eq!(ease_in_out(3.0), 1.0);
}

#[test]
fn test_rise_waits_then_eases_to_absolute_goal() {
    let mut mover = ThresholdRiseMover::new(source(), RiseTarget::Absolute(10.0));
    assert_eq!(mover.advance(0.5, 0.0), None);

    assert!(mover.trigger());
    assert_eq!(mover.advance(0.5, 0.0), None);
    assert_eq!(mover.advance(0.5, 0.0), Some(0.0));
    assert_eq!(
        mover.phase(),
        RisePhase::Rising {
            start_y: 0.0,
            goal_y: 10.0,
            elapsed: 0.0
        }
    );

    assert_relative_eq!(mover.advance(0.4, 0.0).unwrap_or_default(), 5.0, epsilon = 1e-4);
    assert_eq!(mover.advance(1.0, 5.0), Some(10.0));
    assert!(!mover.is_busy());
}

#[test]
fn test_relative_goal_measured_from_rise_start() {
    let mut mover = ThresholdRiseMover::new(source(), RiseTarget::Relative(3.0));
    mover.delay = 0.0;
    mover.trigger();

    assert_eq!(mover.advance(0.1, 2.0), Some(2.0));
    assert_eq!(mover.advance(1.0, 2.0), Some(5.0));
}

#[test]
fn test_retrigger_policy() {
    let mut mover = ThresholdRiseMover::new(source(), RiseTarget::Absolute(4.0));
    mover.delay = 0.0;
    mover.trigger();
    mover.advance(0.1, 0.0);
    mover.advance(0.2, 0.0);

    assert!(mover.trigger());
    assert_eq!(mover.phase(), RisePhase::Waiting { remaining: 0.0 });

    mover.restart_if_retriggered = false;
    mover.advance(0.1, 1.0);
    let rising = mover.phase();
    assert!(!mover.trigger());
    assert_eq!(mover.phase(), rising);
}

// -----------------------------------------------------------------------------
// Down pose gate
// -----------------------------------------------------------------------------

#[test]
fn test_gate_holds_in_down_pose() {
    let mut gate = DownPoseGate::with_delay(0.2);
    assert!(!gate.touched(true));
    assert!(!gate.is_pending());
    assert!(!gate.advance(1.0));
}

#[test]
fn test_gate_gives_way_after_delay() {
    let mut gate = DownPoseGate::with_delay(0.2);
    assert!(gate.touched(false));
    assert!(!gate.touched(false));

    assert!(!gate.advance(0.15));
    assert!(gate.advance(0.15));
    assert!(!gate.is_pending());
    assert!(!gate.advance(0.15));
}

#[test]
fn test_armed_gate_is_disabled_in_world() {
    let mut app = App::new();
    app.init_resource::<Time>()
        .add_systems(Update, tick_down_pose_gates);

    let mut disabled = DownPoseGate::with_delay(0.0);
    disabled.touched(false);
    let kept = app.world_mut().spawn(disabled).id();

    let mut removed = DownPoseGate::with_delay(0.0);
    removed.despawn = true;
    removed.touched(false);
    let gone = app.world_mut().spawn(removed).id();

    let idle = app.world_mut().spawn(DownPoseGate::with_delay(0.0)).id();

    app.update();

    let world = app.world();
    assert!(world.get::<ColliderDisabled>(kept).is_some());
    assert_eq!(world.get::<Visibility>(kept), Some(&Visibility::Hidden));
    assert!(world.get::<DownPoseGate>(kept).is_none());
    assert!(world.get_entity(gone).is_err());
    assert!(world.get::<DownPoseGate>(idle).is_some());
}

// -----------------------------------------------------------------------------
// Water stream
// -----------------------------------------------------------------------------

fn stream() -> WaterStream {
    WaterStream::new(StreamTuning::default(), Vec2::ZERO)
}

#[test]
fn test_stream_travels_along_normalized_flow() {
    let mut stream = WaterStream::new(
        StreamTuning {
            flow_direction: Vec2::new(3.0, 4.0),
            ..default()
        },
        Vec2::ZERO,
    );

    let StreamStep::Flowing { position, scale } = stream.advance(0.2, Vec2::ZERO) else {
        panic!("stream should still be flowing");
    };
    assert_relative_eq!(position.x, 0.6, epsilon = 1e-5);
    assert_relative_eq!(position.y, 0.8, epsilon = 1e-5);
    assert_eq!(scale, 1.0);
}

#[test]
fn test_stream_spent_past_despawn_distance() {
    let mut stream = WaterStream::new(
        StreamTuning {
            despawn_distance: 1.0,
            ..default()
        },
        Vec2::ZERO,
    );
    assert_eq!(stream.advance(0.3, Vec2::ZERO), StreamStep::Spent);
}

#[test]
fn test_blocked_stream_shrinks_recovers_and_shrinks_away() {
    let mut stream = stream();

    stream.mark_blocked();
    stream.advance(0.25, Vec2::ZERO);
    assert_relative_eq!(stream.scale(), 0.5);

    // Block lasts a single step
    stream.advance(0.25, Vec2::ZERO);
    assert_relative_eq!(stream.scale(), 0.75);
    stream.advance(1.0, Vec2::ZERO);
    assert_eq!(stream.scale(), 1.0);

    stream.mark_blocked();
    assert_eq!(stream.advance(1.0, Vec2::ZERO), StreamStep::Spent);
}

#[test]
fn test_stream_contact_outcomes() {
    let stream = stream();

    assert_eq!(stream.contact(true, true), StreamContact::Blocked);
    assert_eq!(
        stream.contact(false, true),
        StreamContact::HaltDash { ignore_input: 0.3 }
    );
    assert_eq!(
        stream.contact(false, false),
        StreamContact::Push {
            impulse: Vec2::new(10.0, 0.0),
            ignore_input: 0.15
        }
    );
    assert_eq!(stream.steady_force(), None);
}

#[test]
fn test_force_mode_pushes_steadily_instead_of_once() {
    let stream = WaterStream::new(
        StreamTuning {
            push_mode: PushMode::Force,
            flow_direction: Vec2::new(0.0, 2.0),
            ..default()
        },
        Vec2::ZERO,
    );

    assert_eq!(
        stream.contact(false, false),
        StreamContact::Push {
            impulse: Vec2::ZERO,
            ignore_input: 0.15
        }
    );
    assert_eq!(stream.steady_force(), Some(Vec2::new(0.0, 10.0)));
}

#[test]
fn test_stream_registers_each_contact_once() {
    let mut stream = stream();
    let player = source();

    assert!(stream.begin_contact(player));
    assert!(!stream.begin_contact(player));
    assert_eq!(stream.contacts(), &[player]);

    stream.end_contact(player);
    assert!(stream.contacts().is_empty());
    assert!(stream.begin_contact(player));
}

#[test]
fn test_spawner_interval_and_toggle() {
    let mut spawner = WaterStreamSpawner::default();
    assert!(!spawner.tick(0.15));
    assert!(spawner.tick(0.1));
    assert!(!spawner.tick(0.1));

    spawner.set_active(false);
    assert!(!spawner.tick(1.0));

    spawner.toggle();
    assert!(spawner.active);
    assert!(spawner.tick(0.25));
}

#[test]
fn test_spawned_streams_carry_spawner_tunables() {
    let spawner = WaterStreamSpawner::new(StreamTuning {
        flow_direction: Vec2::NEG_X,
        flow_speed: 8.0,
        ..default()
    });
    let origin = Vec2::new(1.0, 2.0);

    let mut stream = spawner.spawn_stream(origin);
    assert_eq!(stream.tuning, spawner.stream);
    assert_eq!(
        stream.advance(0.5, origin),
        StreamStep::Flowing {
            position: Vec2::new(-3.0, 2.0),
            scale: 1.0
        }
    );
}

#[test]
fn test_streams_move_and_despawn_in_world() {
    let mut app = App::new();
    app.init_resource::<Time>()
        .add_systems(Update, drive_water_streams);
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(250));

    let flowing = app
        .world_mut()
        .spawn((stream(), Transform::default()))
        .id();
    let short = WaterStream::new(
        StreamTuning {
            despawn_distance: 0.5,
            ..default()
        },
        Vec2::ZERO,
    );
    let spent = app.world_mut().spawn((short, Transform::default())).id();

    app.update();

    let world = app.world();
    let transform = world.get::<Transform>(flowing);
    assert_relative_eq!(
        transform.map_or(0.0, |t| t.translation.x),
        1.25,
        epsilon = 1e-5
    );
    assert!(world.get_entity(spent).is_err());
}

// -----------------------------------------------------------------------------
// Platform riser
// -----------------------------------------------------------------------------

#[test]
fn test_riser_waits_rises_and_returns() {
    let mut riser = PlatformRiser::new(0.0, 3.0);
    assert_eq!(riser.advance(0.5, 0.0), 0.0);

    riser.stepped_on();
    assert!(riser.is_occupied());
    assert_eq!(riser.advance(0.5, 0.0), 0.0);
    assert_relative_eq!(riser.advance(0.5, 0.0), 1.0);
    assert_relative_eq!(riser.advance(1.0, 1.0), 3.0);

    riser.stepped_off();
    assert_relative_eq!(riser.advance(0.5, 3.0), 2.0);
}

#[test]
fn test_riser_without_return_keeps_climbing() {
    let mut riser = PlatformRiser::new(0.0, 3.0);
    riser.return_when_left = false;
    riser.delay = 0.0;

    riser.stepped_on();
    assert_relative_eq!(riser.advance(0.5, 0.0), 1.0);
    riser.stepped_off();
    assert_relative_eq!(riser.advance(0.5, 1.0), 2.0);
    assert_eq!(riser.target_y(), 3.0);
}

#[test]
fn test_smooth_riser_snaps_onto_target() {
    let mut riser = PlatformRiser::new(0.0, 3.0);
    riser.motion = RiseMotion::Smooth;
    riser.speed = 10.0;
    riser.delay = 0.0;
    riser.stepped_on();

    let mut y = riser.advance(0.1, 0.0);
    assert_relative_eq!(y, 3.0 * (1.0 - (-1.0f32).exp()), epsilon = 1e-4);
    for _ in 0..10 {
        y = riser.advance(0.1, y);
    }
    assert_eq!(y, 3.0);
}

#[test]
fn test_riser_reset_returns_home() {
    let mut riser = PlatformRiser::new(-1.0, 3.0);
    riser.delay = 0.0;
    riser.stepped_on();
    riser.advance(1.0, -1.0);

    assert_eq!(riser.reset(), -1.0);
    assert!(!riser.is_occupied());
    assert_eq!(riser.target_y(), riser.home_y());
}
