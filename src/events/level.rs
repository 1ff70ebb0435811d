//! Level load outcome events.
//!
//! [`poll_level_loader`](crate::systems::levelload::poll_level_loader)
//! triggers one of these once a background load finishes. The observers here
//! move the game to [`GameStates::Playing`] or [`GameStates::Failed`].
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

use crate::events::gamestate::GameStateChangedEvent;
use crate::resources::gamestate::{GameStates, NextGameState};

/// A level grid was inserted as the `TileGrid` resource.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelLoadedEvent {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

/// A level failed to load. The world was not modified.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelLoadFailedEvent {
    pub id: String,
    pub reason: String,
}

pub fn observe_level_loaded(
    trigger: On<LevelLoadedEvent>,
    mut commands: Commands,
    mut next_state: ResMut<NextGameState>,
) {
    let event = trigger.event();
    info!(
        "Level '{}' ready ({}x{})",
        event.id, event.width, event.height
    );
    next_state.set(GameStates::Playing);
    commands.trigger(GameStateChangedEvent {});
}

pub fn observe_level_load_failed(
    _trigger: On<LevelLoadFailedEvent>,
    mut commands: Commands,
    mut next_state: ResMut<NextGameState>,
) {
    next_state.set(GameStates::Failed);
    commands.trigger(GameStateChangedEvent {});
}
