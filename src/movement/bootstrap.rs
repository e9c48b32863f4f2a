//! Movement domain: player bootstrap from the loaded tuning.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::CharacterTuning;
use crate::movement::{
    AbilityTint, CharacterBody, CharacterController, GameLayer, InputSnapshot, Player, Senses,
};

pub const PLAYER_SPAWN: Vec2 = Vec2::new(0.0, 2.0);

/// Spawn the player with its own controller built from the current
/// tuning. Each spawned character owns a copy, so instances may differ.
pub(crate) fn spawn_player(
    mut commands: Commands,
    tuning: Res<CharacterTuning>,
    existing_player: Query<Entity, With<Player>>,
) {
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return;
    }

    let size = tuning.body.size();
    let base_color = Color::srgb(0.9, 0.9, 0.9);

    info!(
        "Spawning player: jump_height={}, time_to_apex={}, max_speed={}, max_air_dashes={}",
        tuning.jump.jump_height,
        tuning.jump.time_to_apex,
        tuning.run.max_speed,
        tuning.umbrella.max_air_dashes
    );

    commands.spawn((
        // Identity & control
        (
            Player,
            CharacterController::new(tuning.clone()),
            InputSnapshot::default(),
            Senses::default(),
            CharacterBody::default(),
            AbilityTint { base: base_color },
        ),
        // Rendering
        Sprite {
            color: base_color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(PLAYER_SPAWN.extend(0.0)),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(size.x, size.y),
            Mass(tuning.body.mass),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(0.0), // Gravity is integrated by the controller
            Friction::new(0.0),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
            ),
        ),
    ));
}
