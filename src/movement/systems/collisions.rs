//! Movement domain: ground, umbrella tip and wind zone sensing.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::CharacterTuning;
use crate::movement::{CharacterController, GameLayer, Player, Senses, WindZone};

/// Height of the flat probe swept below the feet.
const FOOT_PROBE_THICKNESS: f32 = 0.05;

pub(crate) fn detect_ground(
    spatial_query: SpatialQuery,
    tuning: Res<CharacterTuning>,
    mut query: Query<(Entity, &Position, &mut Senses), With<Player>>,
) {
    let size = tuning.body.size();
    let probe = Collider::rectangle(size.x * 0.9, FOOT_PROBE_THICKNESS);

    for (entity, position, mut senses) in &mut query {
        // Only hit Ground layer entities, never the player itself
        let filter =
            SpatialQueryFilter::from_mask(GameLayer::Ground).with_excluded_entities([entity]);
        let feet = position.0 - Vec2::new(0.0, size.y * 0.5 - FOOT_PROBE_THICKNESS);

        let hit = spatial_query.cast_shape(
            &probe,
            feet,
            0.0,
            Dir2::NEG_Y,
            &ShapeCastConfig::from_max_distance(tuning.body.ground_probe_distance),
            &filter,
        );

        senses.grounded = hit.is_some();
    }
}

/// Overlap test at the umbrella tip, independent of the feet probe.
pub(crate) fn detect_umbrella_tip(
    spatial_query: SpatialQuery,
    tuning: Res<CharacterTuning>,
    mut query: Query<(Entity, &Position, &mut Senses), With<Player>>,
) {
    let tip = Collider::circle(tuning.body.tip_radius);

    for (entity, position, mut senses) in &mut query {
        let filter =
            SpatialQueryFilter::from_mask(GameLayer::Ground).with_excluded_entities([entity]);
        let center = position.0 + tuning.body.tip_offset();
        senses.tip_touching = !spatial_query
            .shape_intersections(&tip, center, 0.0, &filter)
            .is_empty();
    }
}

pub(crate) fn track_wind_zones(
    mut collision_start_events: MessageReader<CollisionStart>,
    mut collision_end_events: MessageReader<CollisionEnd>,
    zone_query: Query<&WindZone>,
    mut player_query: Query<&mut CharacterController, With<Player>>,
) {
    for event in collision_start_events.read() {
        let (zone_entity, other) = if zone_query.get(event.collider1).is_ok() {
            (event.collider1, event.collider2)
        } else if zone_query.get(event.collider2).is_ok() {
            (event.collider2, event.collider1)
        } else {
            continue;
        };

        let (Ok(zone), Ok(mut controller)) =
            (zone_query.get(zone_entity), player_query.get_mut(other))
        else {
            continue;
        };
        debug!("Entered wind zone {:?}", zone_entity);
        controller.enter_wind_zone(zone_entity, *zone);
    }

    for event in collision_end_events.read() {
        let (zone_entity, other) = if zone_query.get(event.collider1).is_ok() {
            (event.collider1, event.collider2)
        } else if zone_query.get(event.collider2).is_ok() {
            (event.collider2, event.collider1)
        } else {
            continue;
        };

        if let Ok(mut controller) = player_query.get_mut(other) {
            debug!("Left wind zone {:?}", zone_entity);
            controller.exit_wind_zone(zone_entity);
        }
    }
}
