//! Game systems.
//!
//! Submodules overview
//! - [`collision`] – push actors out of solid tiles
//! - [`gamestate`] – check for pending state transitions and trigger events
//! - [`input`] – read the keyboard and update [`crate::resources::input::InputState`]
//! - [`levelload`] – receive finished level loads and publish them
//! - [`movement`] – platformer physics step for controlled actors
//! - [`render`] – draw the grid, actors and debug overlay using Raylib
//! - [`time`] – update simulation time and delta

pub mod collision;
pub mod gamestate;
pub mod input;
pub mod levelload;
pub mod movement;
pub mod render;
pub mod time;
