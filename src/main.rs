//! Tile platformer main entry point.
//!
//! A small 2D platformer written in Rust using:
//! - **raylib** for windowing and drawing
//! - **bevy_ecs** for entity-component-system architecture
//!
//! A level file (JSON) describes a grid of tiles; the grid is loaded on a
//! worker thread, auto-tiled, and the player runs and jumps against it with
//! axis-separated collision resolution.
//!
//! # Main Loop
//!
//! 1. Read `config.ini` and command line overrides
//! 2. Initialize the raylib window, ECS world and resources
//! 3. Enter `Loading`, which requests the level in the background
//! 4. Run the main loop:
//!    - Update input and world time
//!    - Poll the level loader; a finished grid moves the game to `Playing`
//!    - Move the player and resolve tile collisions
//!    - Render the grid, the player and the debug overlay
//! 5. Exit when the window closes, Escape is pressed or loading failed
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --level assets/levels/testmap.json
//! cargo run --release -- --check
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::process::ExitCode;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info};
use rustc_hash::FxHashMap;

use tileplatformer::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use tileplatformer::events::level::{observe_level_load_failed, observe_level_loaded};
use tileplatformer::events::switchdebug::switch_debug_observer;
use tileplatformer::game;
use tileplatformer::resources::gameconfig::GameConfig;
use tileplatformer::resources::gamestate::{GameState, GameStates, NextGameState};
use tileplatformer::resources::input::InputState;
use tileplatformer::resources::level::FsLevelSource;
use tileplatformer::resources::levelloader::{LevelLoadMessage, LevelLoaderBridge};
use tileplatformer::resources::systemsstore::SystemsStore;
use tileplatformer::resources::tilegrid::TileGrid;
use tileplatformer::resources::worldtime::WorldTime;
use tileplatformer::systems::gamestate::{check_pending_state, state_is_playing};
use tileplatformer::systems::input::update_input_state;
use tileplatformer::systems::levelload::poll_level_loader;
use tileplatformer::systems::movement::player_update_system;
use tileplatformer::systems::render::render_system;
use tileplatformer::systems::time::update_world_time;

/// Tile platformer
#[derive(Parser)]
#[command(version, about = "A tile-based platformer with auto-tiled levels.")]
struct Cli {
    /// Level file to play, overriding `[level] path` in the config.
    #[arg(long, value_name = "PATH")]
    level: Option<String>,

    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load and validate the level, print a summary and exit.
    #[arg(long)]
    check: bool,
}

fn print_summary(id: &str, grid: &TileGrid) {
    let mut histogram: FxHashMap<u16, usize> = FxHashMap::default();
    for (_, _, tile) in grid.iter() {
        if let Some(variant) = tile.variant {
            *histogram.entry(variant).or_default() += 1;
        }
    }
    let mut variants: Vec<(u16, usize)> = histogram.into_iter().collect();
    variants.sort_unstable();

    println!("{}: {}x{} tiles, tile size {}", id, grid.width(), grid.height(), grid.tile_size());
    println!("solid tiles: {}", grid.solid_count());
    for (variant, count) in variants {
        println!("  variant {:>2}: {}", variant, count);
    }
}

/// `--check`: load the level on the loader thread and report.
fn check_level(config: &GameConfig) -> ExitCode {
    let settings = match config.level_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: autotile rules: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut bridge = LevelLoaderBridge::new();
    bridge.request(FsLevelSource::new(), config.level_path.clone(), settings);
    match bridge.wait() {
        Some(LevelLoadMessage::Loaded { id, grid }) => {
            print_summary(&id, &grid);
            ExitCode::SUCCESS
        }
        Some(LevelLoadMessage::Failed { id, error }) => {
            eprintln!("Error: {id}: {error}");
            ExitCode::FAILURE
        }
        None => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(level) = cli.level {
        config.level_path = level;
    }

    // Early-exit: validate the level without opening a window
    if cli.check {
        return check_level(&config);
    }

    // --------------- Raylib window ---------------
    let (window_width, window_height) = config.window_size();
    let mut builder = raylib::init();
    builder
        .size(window_width as i32, window_height as i32)
        .title("Tile Platformer");
    if config.vsync {
        builder.vsync();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);
    // Escape is handled as an input action
    rl.set_exit_key(None);

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());
    world.insert_resource(LevelLoaderBridge::new());
    world.insert_resource(config);
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    world.spawn(Observer::new(observe_gamestate_change_event));
    world.spawn(Observer::new(observe_level_loaded));
    world.spawn(Observer::new(observe_level_load_failed));
    world.spawn(Observer::new(switch_debug_observer));

    // Game state hooks
    let mut systems_store = SystemsStore::new();
    systems_store.register(&mut world, "request_level", game::request_level);
    systems_store.register(&mut world, "enter_play", game::enter_play);
    world.insert_resource(systems_store);

    world.flush();

    world.resource_mut::<NextGameState>().set(GameStates::Loading);
    world.trigger(GameStateChangedEvent {});

    let mut update = Schedule::default();
    update.add_systems(
        (
            update_input_state,
            poll_level_loader,
            check_pending_state,
            player_update_system.run_if(state_is_playing),
            render_system,
        )
            .chain(),
    );

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
        && !world.resource::<GameState>().is_terminal()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers();
    }

    if matches!(world.resource::<GameState>().get(), GameStates::Failed) {
        error!("Exiting: level could not be loaded");
        return ExitCode::FAILURE;
    }
    info!("Bye");
    ExitCode::SUCCESS
}
