//! Mechanics domain: debug-only props for the test room.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::mechanics::components::{
    AttackStepDriver, DownPoseGate, PlatformRiser, RiseTarget, StreamTuning, ThresholdRiseMover,
    WaterStreamSpawner,
};
use crate::movement::{GameLayer, Ground};

pub(crate) fn spawn_mechanics_demo(mut commands: Commands) {
    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);

    // Pillar that climbs with each attack, and a ledge that rises once it
    // tops out
    let driver = commands
        .spawn((
            AttackStepDriver::new(5, 5).with_range(-1.0, 1.5),
            Sprite {
                color: Color::srgb(0.3, 0.6, 0.9),
                custom_size: Some(Vec2::new(1.0, 1.0)),
                ..default()
            },
            Transform::from_xyz(-15.0, -1.0, 0.0),
        ))
        .id();

    commands.spawn((
        Ground,
        ThresholdRiseMover::new(driver, RiseTarget::Relative(3.0)),
        Sprite {
            color: Color::srgb(0.5, 0.4, 0.3),
            custom_size: Some(Vec2::new(3.0, 0.5)),
            ..default()
        },
        Transform::from_xyz(-17.0, 0.0, 0.0),
        RigidBody::Kinematic,
        Collider::rectangle(3.0, 0.5),
        ground_layers,
    ));

    // Brittle bridge that only holds in down pose
    commands.spawn((
        Ground,
        DownPoseGate::with_delay(0.2),
        Sprite {
            color: Color::srgb(0.7, 0.6, 0.5),
            custom_size: Some(Vec2::new(3.0, 0.3)),
            ..default()
        },
        Transform::from_xyz(0.0, 4.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(3.0, 0.3),
        ground_layers,
    ));

    // Hose pointing left across the room
    commands.spawn((
        WaterStreamSpawner::new(StreamTuning {
            flow_direction: Vec2::NEG_X,
            ..default()
        }),
        Transform::from_xyz(12.0, 1.0, 0.0),
    ));

    // Lift that carries the character up after a short wait
    commands.spawn((
        Ground,
        PlatformRiser::new(0.0, 3.5),
        Sprite {
            color: Color::srgb(0.4, 0.5, 0.4),
            custom_size: Some(Vec2::new(2.0, 0.4)),
            ..default()
        },
        Transform::from_xyz(5.0, 0.0, 0.0),
        RigidBody::Kinematic,
        Collider::rectangle(2.0, 0.4),
        ground_layers,
    ));
}
