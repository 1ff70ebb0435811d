//! Input systems.
//!
//! - [`update_input_state`] reads the keyboard from Raylib each frame and
//!   writes the results into [`crate::resources::input::InputState`].
//! - Control keys emit events: F11 toggles debug mode via
//!   [`SwitchDebugEvent`], Escape requests [`GameStates::Quitting`].
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;

use crate::events::switchdebug::SwitchDebugEvent;
use crate::resources::gamestate::{GameStates, NextGameState};
use crate::resources::input::{BoolState, InputState};

fn poll(state: &mut BoolState, rl: &raylib::RaylibHandle) {
    let down = |key: KeyboardKey| key != KeyboardKey::KEY_NULL && rl.is_key_down(key);
    state.update(down(state.key_binding) || down(state.alt_binding));
}

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSend<raylib::RaylibHandle>,
    mut next_state: ResMut<NextGameState>,
    mut commands: Commands,
) {
    let input = &mut *input;
    poll(&mut input.move_left, &rl);
    poll(&mut input.move_right, &rl);
    poll(&mut input.jump, &rl);
    poll(&mut input.action_back, &rl);
    poll(&mut input.mode_debug, &rl);

    if input.mode_debug.just_pressed {
        commands.trigger(SwitchDebugEvent {});
    }
    if input.action_back.just_pressed {
        next_state.set(GameStates::Quitting);
    }
}
