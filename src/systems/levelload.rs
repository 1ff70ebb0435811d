//! Level loading systems.
//!
//! - [`poll_level_loader`] drains finished loads from the
//!   [`LevelLoaderBridge`] once per frame and publishes the result.
use bevy_ecs::prelude::*;
use log::error;

use crate::events::level::{LevelLoadFailedEvent, LevelLoadedEvent};
use crate::resources::levelloader::{LevelLoadMessage, LevelLoaderBridge};

/// Move finished grids into the world and announce the outcome.
///
/// On success the grid becomes the `TileGrid` resource, replacing any
/// previous one. On failure nothing is inserted or removed.
pub fn poll_level_loader(mut commands: Commands, mut bridge: ResMut<LevelLoaderBridge>) {
    while let Some(msg) = bridge.try_recv() {
        match msg {
            LevelLoadMessage::Loaded { id, grid } => {
                let (width, height) = (grid.width(), grid.height());
                commands.insert_resource(grid);
                commands.trigger(LevelLoadedEvent { id, width, height });
            }
            LevelLoadMessage::Failed { id, error } => {
                error!("Failed to load level '{}': {}", id, error);
                commands.trigger(LevelLoadFailedEvent {
                    id,
                    reason: error.to_string(),
                });
            }
        }
    }
}
