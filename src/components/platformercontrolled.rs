//! Platformer movement tuning for input-driven actors.
//!
//! [`PlatformerControlled`] marks an entity as driven by
//! [`InputState`](crate::resources::input::InputState) and describes how it
//! responds. The
//! [`player_update_system`](crate::systems::movement::player_update_system)
//! reads it together with the [`Actor`](crate::components::actor::Actor).

use bevy_ecs::prelude::Component;

pub const DEFAULT_RUN_SPEED: f32 = 160.0;
pub const DEFAULT_JUMP_SPEED: f32 = 420.0;
pub const DEFAULT_GRAVITY: f32 = 980.0;
pub const DEFAULT_MAX_FALL_SPEED: f32 = 900.0;

/// Movement constants for a platformer actor, in world units and seconds.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PlatformerControlled {
    /// Horizontal speed while left or right is held.
    pub run_speed: f32,
    /// Upward speed applied when a grounded actor jumps.
    pub jump_speed: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Clamp for downward velocity.
    pub max_fall_speed: f32,
}

impl Default for PlatformerControlled {
    fn default() -> Self {
        Self {
            run_speed: DEFAULT_RUN_SPEED,
            jump_speed: DEFAULT_JUMP_SPEED,
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
        }
    }
}

impl PlatformerControlled {
    pub fn new(run_speed: f32, jump_speed: f32, gravity: f32, max_fall_speed: f32) -> Self {
        Self {
            run_speed,
            jump_speed,
            gravity,
            max_fall_speed,
        }
    }
}
