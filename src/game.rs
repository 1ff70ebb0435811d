//! Game state hooks.
//!
//! These systems are registered in the
//! [`SystemsStore`](crate::resources::systemsstore::SystemsStore) and run by
//! the game state observer when a state is entered:
//!
//! - [`request_level`] on `Loading`: starts the background load of the
//!   configured level.
//! - [`enter_play`] on `Playing`: spawns the player at the spawn point.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::actor::Actor;
use crate::events::level::LevelLoadFailedEvent;
use crate::resources::gameconfig::GameConfig;
use crate::resources::level::FsLevelSource;
use crate::resources::levelloader::LevelLoaderBridge;

/// Ask the loader bridge for the level named in [`GameConfig`].
pub fn request_level(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut bridge: ResMut<LevelLoaderBridge>,
) {
    let settings = match config.level_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load autotile rules: {}", e);
            commands.trigger(LevelLoadFailedEvent {
                id: config.level_path.clone(),
                reason: e.to_string(),
            });
            return;
        }
    };
    info!("Loading level '{}'", config.level_path);
    bridge.request(FsLevelSource::new(), config.level_path.clone(), settings);
}

/// Spawn the player, or put an existing one back at the spawn point.
pub fn enter_play(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut actors: Query<&mut Actor>,
) {
    let fresh = config.spawn_actor();
    let mut reset = 0;
    for mut actor in actors.iter_mut() {
        *actor = fresh;
        reset += 1;
    }
    if reset == 0 {
        commands.spawn((fresh, config.player_tuning()));
        info!(
            "Player spawned at ({}, {})",
            fresh.position.x, fresh.position.y
        );
    }
}
