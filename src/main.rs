use avian2d::prelude::*;
use bevy::prelude::*;

use umbrella_platformer::{
    content::ContentPlugin, core::CorePlugin, mechanics::MechanicsPlugin,
    movement::MovementPlugin,
};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Umbrella Platformer".to_string(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins((
            CorePlugin,
            ContentPlugin::default(),
            MovementPlugin,
            MechanicsPlugin,
        ))
        .run();
}
