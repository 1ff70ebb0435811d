//! Player integration tests: the platformer step and tile collision running
//! through a schedule against the bundled 20x11 test map.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use tileplatformer::components::actor::Actor;
use tileplatformer::components::platformercontrolled::PlatformerControlled;
use tileplatformer::resources::input::InputState;
use tileplatformer::resources::level::{FsLevelSource, LevelSettings, load_level};
use tileplatformer::resources::tilegrid::TileGrid;
use tileplatformer::resources::worldtime::WorldTime;
use tileplatformer::systems::movement::player_update_system;
use tileplatformer::systems::time::update_world_time;

const EPSILON: f32 = 1e-2;
const FRAME: f32 = 1.0 / 60.0;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn test_map() -> TileGrid {
    let source = FsLevelSource::with_root(env!("CARGO_MANIFEST_DIR"));
    load_level(
        &source,
        "assets/levels/testmap.json",
        &LevelSettings::default(),
    )
    .unwrap()
}

fn make_world(spawn: Vector2) -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(test_map());
    let player = world
        .spawn((
            Actor::new(spawn, Vector2::new(24.0, 32.0)),
            PlatformerControlled::default(),
        ))
        .id();
    (world, player)
}

fn tick(world: &mut World, frames: usize) {
    tick_with(world, frames, FRAME);
}

fn tick_with(world: &mut World, frames: usize, dt: f32) {
    let mut schedule = Schedule::default();
    schedule.add_systems(player_update_system);
    for _ in 0..frames {
        update_world_time(world, dt);
        schedule.run(world);
    }
}

fn actor(world: &World, entity: Entity) -> Actor {
    *world.get::<Actor>(entity).unwrap()
}

#[test]
fn idle_player_falls_and_rests_on_floor() {
    let (mut world, player) = make_world(Vector2::new(100.0, 100.0));
    tick(&mut world, 120);

    let a = actor(&world, player);
    assert!(a.grounded);
    assert_eq!(a.velocity.y, 0.0);
    assert!(approx_eq(a.bottom(), 320.0));
    assert!(approx_eq(a.position.x, 100.0));

    // Resting is stable frame after frame.
    tick(&mut world, 30);
    let b = actor(&world, player);
    assert!(b.grounded);
    assert!(approx_eq(b.bottom(), 320.0));
}

#[test]
fn slow_frames_still_land_on_floor() {
    for dt in [0.05, 0.07, 0.1] {
        let (mut world, player) = make_world(Vector2::new(100.0, 100.0));
        tick_with(&mut world, (3.0 / dt) as usize, dt);

        let a = actor(&world, player);
        assert!(a.grounded, "not grounded at dt = {dt}");
        assert!(approx_eq(a.bottom(), 320.0), "bottom {} at dt = {dt}", a.bottom());
        assert!(approx_eq(a.position.x, 100.0), "x {} at dt = {dt}", a.position.x);
    }
}

#[test]
fn player_is_airborne_while_falling() {
    let (mut world, player) = make_world(Vector2::new(100.0, 100.0));
    tick(&mut world, 10);
    let a = actor(&world, player);
    assert!(!a.grounded);
    assert!(a.velocity.y > 0.0);
    assert!(a.position.y > 100.0);
}

#[test]
fn jump_only_from_ground() {
    let (mut world, player) = make_world(Vector2::new(100.0, 100.0));
    world.resource_mut::<InputState>().jump.active = true;
    tick(&mut world, 1);
    // Airborne at spawn: jump is ignored, gravity wins.
    assert!(actor(&world, player).velocity.y > 0.0);

    world.resource_mut::<InputState>().jump.active = false;
    tick(&mut world, 120);
    assert!(actor(&world, player).grounded);

    world.resource_mut::<InputState>().jump.active = true;
    tick(&mut world, 1);
    let a = actor(&world, player);
    let tuning = PlatformerControlled::default();
    assert!(!a.grounded);
    assert!(approx_eq(a.velocity.y, -tuning.jump_speed));
    assert!(a.bottom() < 320.0);
}

#[test]
fn running_right_stops_at_step() {
    let (mut world, player) = make_world(Vector2::new(500.0, 288.0));
    world.resource_mut::<InputState>().move_right.active = true;
    tick(&mut world, 120);

    let a = actor(&world, player);
    // Cell (19, 9) starts at x = 608.
    assert!(approx_eq(a.position.x + a.size.x, 608.0));
    assert_eq!(a.velocity.x, 0.0);
    assert!(a.grounded);
    assert!(approx_eq(a.bottom(), 320.0));
}

#[test]
fn running_left_along_floor_does_not_snag_on_seams() {
    let (mut world, player) = make_world(Vector2::new(400.0, 288.0));
    world.resource_mut::<InputState>().move_left.active = true;
    tick(&mut world, 60);

    let a = actor(&world, player);
    let tuning = PlatformerControlled::default();
    // Nothing blocks between x = 400 and x = 240: a full second of running.
    assert!(approx_eq(a.position.x, 400.0 - tuning.run_speed * 60.0 * FRAME));
    assert!(a.grounded);
    assert!(approx_eq(a.bottom(), 320.0));
}
