//! Game flow integration tests: state hooks, background loading and player
//! spawn wired together the way the binary does it, minus the window.

use std::thread;
use std::time::Duration;

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use tileplatformer::components::actor::Actor;
use tileplatformer::components::platformercontrolled::PlatformerControlled;
use tileplatformer::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use tileplatformer::events::level::{observe_level_load_failed, observe_level_loaded};
use tileplatformer::game;
use tileplatformer::resources::gameconfig::GameConfig;
use tileplatformer::resources::gamestate::{GameState, GameStates, NextGameState};
use tileplatformer::resources::input::InputState;
use tileplatformer::resources::levelloader::LevelLoaderBridge;
use tileplatformer::resources::systemsstore::SystemsStore;
use tileplatformer::resources::tilegrid::TileGrid;
use tileplatformer::resources::worldtime::WorldTime;
use tileplatformer::systems::gamestate::{check_pending_state, state_is_playing};
use tileplatformer::systems::levelload::poll_level_loader;
use tileplatformer::systems::movement::player_update_system;
use tileplatformer::systems::time::update_world_time;

fn make_world(config: GameConfig) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());
    world.insert_resource(LevelLoaderBridge::new());
    world.insert_resource(config);

    world.spawn(Observer::new(observe_gamestate_change_event));
    world.spawn(Observer::new(observe_level_loaded));
    world.spawn(Observer::new(observe_level_load_failed));

    let mut systems_store = SystemsStore::new();
    systems_store.register(&mut world, "request_level", game::request_level);
    systems_store.register(&mut world, "enter_play", game::enter_play);
    world.insert_resource(systems_store);
    world.flush();

    world.resource_mut::<NextGameState>().set(GameStates::Loading);
    world.trigger(GameStateChangedEvent {});
    world
}

fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            poll_level_loader,
            check_pending_state,
            player_update_system.run_if(state_is_playing),
        )
            .chain(),
    );
    schedule
}

/// Run frames until the state leaves `Loading`.
fn run_until_loaded(world: &mut World, schedule: &mut Schedule) {
    for _ in 0..500 {
        update_world_time(world, 1.0 / 60.0);
        schedule.run(world);
        if world.resource::<GameState>().get() != &GameStates::Loading {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("still loading");
}

fn level_config(dir: &tempfile::TempDir, json: &str) -> GameConfig {
    let path = dir.path().join("level.json");
    std::fs::write(&path, json).unwrap();
    let mut config = GameConfig::new();
    config.level_path = path.display().to_string();
    config
}

#[test]
fn loading_then_playing_spawns_player() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = level_config(
        &dir,
        r#"{"width":10,"height":6,"tiles":[{"x":0,"y":5,"type":1},{"x":1,"y":5,"type":1},{"x":2,"y":5,"type":1}]}"#,
    );
    config.spawn = Vector2::new(8.0, 100.0);
    let mut world = make_world(config);
    assert_eq!(world.resource::<GameState>().get(), &GameStates::Loading);
    assert!(world.resource::<LevelLoaderBridge>().is_loading());

    let mut schedule = frame_schedule();
    run_until_loaded(&mut world, &mut schedule);

    assert_eq!(world.resource::<GameState>().get(), &GameStates::Playing);
    assert_eq!(world.resource::<TileGrid>().solid_count(), 3);

    let mut q = world.query::<(&Actor, &PlatformerControlled)>();
    let players: Vec<_> = q.iter(&world).map(|(a, _)| *a).collect();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].position, Vector2::new(8.0, 100.0));

    // Let the player fall onto the floor row at y = 160.
    for _ in 0..120 {
        update_world_time(&mut world, 1.0 / 60.0);
        schedule.run(&mut world);
    }
    let player = *world.query::<&Actor>().single(&world).unwrap();
    assert!(player.grounded);
    assert!((player.bottom() - 160.0).abs() < 1e-2);
}

#[test]
fn invalid_level_fails_without_grid_or_player() {
    let dir = tempfile::tempdir().unwrap();
    let config = level_config(&dir, r#"{"width":0,"height":6,"tiles":[]}"#);
    let mut world = make_world(config);

    let mut schedule = frame_schedule();
    run_until_loaded(&mut world, &mut schedule);

    assert_eq!(world.resource::<GameState>().get(), &GameStates::Failed);
    assert!(world.resource::<GameState>().is_terminal());
    assert!(!world.contains_resource::<TileGrid>());
    assert_eq!(world.query::<&Actor>().iter(&world).count(), 0);
}

#[test]
fn missing_autotile_rules_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = level_config(&dir, r#"{"width":2,"height":2,"tiles":[]}"#);
    config.autotile_path = Some(dir.path().join("nope.json"));
    let mut world = make_world(config);

    // Nothing was requested; the failure was reported immediately.
    assert!(!world.resource::<LevelLoaderBridge>().is_loading());
    frame_schedule().run(&mut world);
    assert_eq!(world.resource::<GameState>().get(), &GameStates::Failed);
}
