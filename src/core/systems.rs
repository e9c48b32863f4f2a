//! Core domain: camera setup and limiter timing.

use bevy::prelude::*;

use crate::core::resources::MovementLimiter;

/// World units are meters; this keeps a ~32 m wide view at 1280 px.
const CAMERA_SCALE: f32 = 1.0 / 40.0;

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 2.0, 0.0),
    ));
}

pub(crate) fn tick_movement_limiter(time: Res<Time>, mut limiter: ResMut<MovementLimiter>) {
    let was_enabled = limiter.can_move();
    limiter.tick(time.delta_secs());
    if !was_enabled && limiter.can_move() {
        debug!("Movement limiter re-enabled");
    }
}
