//! Event types and observers.
//!
//! Submodules:
//! - [`gamestate`] – state transition notifications for the high-level game flow
//! - [`level`] – outcome of a background level load
//! - [`switchdebug`] – toggle the debug overlay on/off
pub mod gamestate;
pub mod level;
pub mod switchdebug;
