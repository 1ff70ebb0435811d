//! Tile platformer library.
//!
//! Exposes the tile grid, level loading, collision and player systems for
//! the game binary and for integration tests.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
