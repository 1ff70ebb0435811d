//! Game state transition event and observer.
//!
//! Systems can request a change to the high-level [`GameStates`] by updating
//! [`NextGameState`]. Emitting a [`GameStateChangedEvent`] then triggers the
//! observer in this module, which applies the transition to [`GameState`]
//! and invokes the enter hooks stored in
//! [`crate::resources::systemsstore::SystemsStore`].
use crate::resources::gamestate::NextGameStates::{Pending, Unchanged};
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::systemsstore::SystemsStore;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, error, info, warn};

/// Event used to indicate that a pending game state transition should be
/// applied.
///
/// Emitting this event causes [`observe_gamestate_change_event`] to read
/// [`NextGameState`]. If it contains [`Pending`], the observer updates the
/// authoritative [`GameState`], runs exit/enter hooks, and clears the pending
/// value; if it is [`Unchanged`], nothing happens.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Observer that applies a pending game state transition.
///
/// Enter hooks are looked up in [`SystemsStore`] under `"request_level"`
/// (for [`GameStates::Loading`]) and `"enter_play"` (for
/// [`GameStates::Playing`]). A missing hook is logged and skipped.
pub fn observe_gamestate_change_event(
    _trigger: On<GameStateChangedEvent>,
    mut commands: Commands,
    mut next_game_state: Option<ResMut<NextGameState>>,
    mut game_state: Option<ResMut<GameState>>,
    systems_store: Option<Res<SystemsStore>>,
) {
    debug!("GameStateChangedEvent triggered");

    let (Some(next_game_state), Some(game_state)) =
        (next_game_state.as_deref_mut(), game_state.as_deref_mut())
    else {
        warn!(
            "One or more resources missing in observe_gamestate_change_event. next_state: {:?}, game_state: {:?}",
            next_game_state.is_some(),
            game_state.is_some()
        );
        return;
    };

    match next_game_state.get().clone() {
        Pending(new_state) => {
            let old_state = game_state.get().clone();
            info!("Transitioning from {:?} to {:?}", old_state, new_state);
            game_state.set(new_state.clone());
            next_game_state.reset();
            on_state_exit(&old_state);
            on_state_enter(&new_state, &mut commands, systems_store.as_deref());
        }
        Unchanged => {
            debug!("No state change pending.");
        }
    }
}

fn run_hook(commands: &mut Commands, systems_store: Option<&SystemsStore>, name: &str) {
    match systems_store.and_then(|store| store.get(name)) {
        Some(id) => commands.run_system(*id),
        None => warn!("No '{}' system registered, skipping", name),
    }
}

/// Internal: run state-specific "enter" systems for the given state.
fn on_state_enter(
    state: &GameStates,
    commands: &mut Commands,
    systems_store: Option<&SystemsStore>,
) {
    match state {
        GameStates::None => debug!("Entered None state"),
        GameStates::Loading => run_hook(commands, systems_store, "request_level"),
        GameStates::Playing => run_hook(commands, systems_store, "enter_play"),
        GameStates::Failed => error!("Entered Failed state, no level to play"),
        GameStates::Quitting => info!("Quitting"),
    }
}

/// Internal: log leaving a state.
fn on_state_exit(state: &GameStates) {
    debug!("Exited {:?} state", state);
}
