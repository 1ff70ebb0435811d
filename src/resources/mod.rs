//! ECS resources made available to systems.
//!
//! Overview
//! - `autotile` – neighbor bitmask to tile variant lookup table
//! - `debugmode` – presence toggles the debug overlay
//! - `gameconfig` – settings loaded from `config.ini`
//! - `gamestate` – authoritative and pending high-level game state
//! - `input` – per-frame keyboard state and the player intent trait
//! - `level` – level file parsing, validation and grid building
//! - `levelloader` – worker thread bridge for loading levels
//! - `systemsstore` – registry of state hook systems by name
//! - `tilegrid` – the loaded grid of tiles
//! - `tilepalette` – which level tile types are solid
//! - `worldtime` – simulation time and delta
pub mod autotile;
pub mod debugmode;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod level;
pub mod levelloader;
pub mod systemsstore;
pub mod tilegrid;
pub mod tilepalette;
pub mod worldtime;
