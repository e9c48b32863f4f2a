//! Movement domain: debug-only test room and gizmo overlay.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{
    CharacterController, GameLayer, Ground, HookRail, Player, SwingAnchor, Wall, WindZone,
};

pub(crate) fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);

    let mut solid = |marker_is_ground: bool, color: Color, size: Vec2, at: Vec2| {
        let mut entity = commands.spawn((
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(at.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
        ));
        if marker_is_ground {
            entity.insert((Ground, ground_layers));
        } else {
            entity.insert((Wall, wall_layers));
        }
    };

    // Floor and walls
    solid(true, ground_color, Vec2::new(40.0, 1.0), Vec2::new(0.0, -1.5));
    solid(false, wall_color, Vec2::new(1.0, 16.0), Vec2::new(-20.5, 6.0));
    solid(false, wall_color, Vec2::new(1.0, 16.0), Vec2::new(20.5, 6.0));

    // Platforms
    solid(true, platform_color, Vec2::new(4.0, 0.5), Vec2::new(-9.0, 2.5));
    solid(true, platform_color, Vec2::new(4.0, 0.5), Vec2::new(9.0, 4.5));

    // Swing anchors over the gap between the platforms
    for (x, y, priority_boost) in [(-3.0, 8.0, 0.0), (3.0, 9.0, 0.25)] {
        commands.spawn((
            SwingAnchor {
                priority_boost,
                ..default()
            },
            Transform::from_xyz(x, y, 0.0),
            RigidBody::Static,
            Collider::circle(0.25),
            Sensor,
            CollisionLayers::new(GameLayer::Anchor, [GameLayer::Player]),
        ));
    }

    // Hook rail from the left platform up to the right one
    commands.spawn((
        HookRail {
            points: vec![
                Vec2::new(-7.0, 4.5),
                Vec2::new(-2.0, 7.0),
                Vec2::new(2.0, 7.0),
                Vec2::new(7.0, 6.0),
            ],
            ..default()
        },
        Transform::default(),
    ));

    // Updraft on the right side of the room
    commands.spawn((
        WindZone {
            direction: Vec2::Y,
            strength: 14.0,
            ..default()
        },
        Transform::from_xyz(15.0, 5.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(4.0, 12.0),
        Sensor,
        CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player]),
    ));
}

pub(crate) fn draw_movement_gizmos(
    mut gizmos: Gizmos,
    anchors: Query<(&GlobalTransform, &SwingAnchor)>,
    rails: Query<(&GlobalTransform, &HookRail)>,
    zones: Query<(&GlobalTransform, &WindZone, &Collider)>,
    players: Query<(&Position, &CharacterController), With<Player>>,
) {
    for (transform, anchor) in &anchors {
        let at = transform.translation().truncate();
        gizmos.circle_2d(Isometry2d::from_translation(at), 0.25, Color::srgb(0.9, 0.9, 0.3));
        gizmos.circle_2d(
            Isometry2d::from_translation(at),
            anchor.magnet_radius,
            Color::srgba(0.9, 0.9, 0.3, 0.2),
        );
    }

    for (transform, rail) in &rails {
        let origin = transform.translation().truncate();
        for segment in rail.points.windows(2) {
            gizmos.line_2d(
                origin + segment[0],
                origin + segment[1],
                Color::srgb(0.95, 0.6, 0.2),
            );
        }
        if let Some(start) = rail.points.first() {
            gizmos.circle_2d(
                Isometry2d::from_translation(origin + *start),
                rail.detection_radius,
                Color::srgba(0.95, 0.6, 0.2, 0.2),
            );
        }
    }

    for (transform, zone, collider) in &zones {
        let at = transform.translation().truncate();
        let size = collider
            .shape_scaled()
            .as_cuboid()
            .map_or(Vec2::splat(1.0), |c| Vec2::new(c.half_extents.x, c.half_extents.y) * 2.0);
        gizmos.rect_2d(Isometry2d::from_translation(at), size, Color::srgba(0.5, 0.7, 1.0, 0.4));
        gizmos.arrow_2d(at, at + zone.direction.normalize_or_zero() * 2.0, Color::srgb(0.5, 0.7, 1.0));
    }

    for (position, controller) in &players {
        if let Some(anchor) = controller.swing().anchor() {
            gizmos.line_2d(position.0, anchor, Color::srgb(0.8, 0.8, 0.8));
        }
    }
}
