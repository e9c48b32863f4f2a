//! Movement domain: keyboard sampling into the per-character input snapshot.

use bevy::prelude::*;

use crate::content::CharacterTuning;
use crate::movement::{Button, InputSnapshot, Player};

fn any_pressed(keyboard: &ButtonInput<KeyCode>, keys: &[KeyCode]) -> bool {
    keys.iter().any(|k| keyboard.pressed(*k))
}

fn any_just_pressed(keyboard: &ButtonInput<KeyCode>, keys: &[KeyCode]) -> bool {
    keys.iter().any(|k| keyboard.just_pressed(*k))
}

fn bindings(button: Button) -> &'static [KeyCode] {
    match button {
        Button::Jump => &[KeyCode::Space, KeyCode::KeyK],
        Button::Action => &[KeyCode::KeyJ],
        Button::Dash => &[KeyCode::ShiftLeft, KeyCode::KeyL],
        Button::Interact => &[KeyCode::KeyE],
    }
}

pub(crate) fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    tuning: Res<CharacterTuning>,
    mut query: Query<&mut InputSnapshot, With<Player>>,
) {
    let mut x = 0.0;
    if any_pressed(&keyboard, &[KeyCode::KeyA, KeyCode::ArrowLeft]) {
        x -= 1.0;
    }
    if any_pressed(&keyboard, &[KeyCode::KeyD, KeyCode::ArrowRight]) {
        x += 1.0;
    }

    // Down enters the down pose, up turns a dash vertical
    let mut y = 0.0;
    if any_pressed(&keyboard, &[KeyCode::KeyS, KeyCode::ArrowDown]) {
        y -= 1.0;
    }
    if any_pressed(&keyboard, &[KeyCode::KeyW, KeyCode::ArrowUp]) {
        y += 1.0;
    }

    for mut input in &mut query {
        input.set_move(Vec2::new(x, y), tuning.run.input_deadzone);
        for button in Button::ALL {
            let keys = bindings(button);
            input.set_button(
                button,
                any_pressed(&keyboard, keys),
                any_just_pressed(&keyboard, keys),
            );
        }
    }
}
