//! Player movement: input, gravity, integration, then tile collision.
//!
//! [`update_player`] is the per-frame step of the platformer controller:
//!
//! 1. Add gravity to vertical velocity.
//! 2. If jump is requested and the actor was grounded last frame, replace
//!    vertical velocity with the upward jump speed.
//! 3. Set horizontal velocity directly from the left/right intent.
//! 4. Integrate position with the updated velocity (semi-implicit Euler).
//! 5. Resolve collisions against the grid and keep the corrected state.
//!
//! Steps 4 and 5 run in substeps short enough that no single move covers
//! more than half of the actor or of a tile. A long frame therefore cannot
//! sink the actor deep enough into the floor for the resolver to prefer a
//! sideways push.
//!
//! [`player_update_system`] runs it for every controlled actor using the
//! shared input and time resources.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::Actor;
use crate::components::platformercontrolled::PlatformerControlled;
use crate::resources::input::{InputState, PlayerIntent};
use crate::resources::tilegrid::TileGrid;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::{CollisionOutcome, resolve_tile_collisions};

/// Longest frame step integrated at once, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Upper bound on substeps per frame.
pub const MAX_SUBSTEPS: u32 = 64;

/// Number of integrate-and-resolve passes needed to move `actor` by its
/// velocity over `dt` without any pass exceeding half of the smallest of
/// the actor's sides and the tile size.
pub fn substep_count(actor: &Actor, tile_size: f32, dt: f32) -> u32 {
    let travel = actor.velocity.x.abs().max(actor.velocity.y.abs()) * dt;
    let limit = 0.5 * actor.size.x.min(actor.size.y).min(tile_size);
    if !travel.is_finite() || limit.is_nan() || limit <= 0.0 {
        return 1;
    }
    ((travel / limit).ceil() as u32).clamp(1, MAX_SUBSTEPS)
}

/// Advance `actor` by one frame of `dt` seconds. See the module docs.
///
/// The returned outcome holds the contacts of every substep in order.
pub fn update_player(
    actor: &mut Actor,
    tuning: &PlatformerControlled,
    intent: &impl PlayerIntent,
    grid: &TileGrid,
    dt: f32,
) -> CollisionOutcome {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    };

    actor.velocity.y += tuning.gravity * dt;
    if intent.jump() && actor.grounded {
        actor.velocity.y = -tuning.jump_speed;
    }
    actor.velocity.y = actor.velocity.y.min(tuning.max_fall_speed);
    actor.velocity.x = intent.horizontal() * tuning.run_speed;

    let steps = substep_count(actor, grid.tile_size(), dt);
    let step_dt = dt / steps as f32;
    let mut outcome = CollisionOutcome::default();
    let mut grounded = false;
    for _ in 0..steps {
        actor.position = actor.position + actor.velocity.scale_by(step_dt);
        let step = resolve_tile_collisions(actor, grid);
        grounded |= actor.grounded;
        outcome.contacts.extend(step.contacts);
    }
    actor.grounded = grounded;
    outcome
}

/// Update every input-controlled actor against the loaded grid.
pub fn player_update_system(
    mut query: Query<(&mut Actor, &PlatformerControlled)>,
    input: Res<InputState>,
    grid: Res<TileGrid>,
    time: Res<WorldTime>,
) {
    for (mut actor, tuning) in query.iter_mut() {
        let was_grounded = actor.grounded;
        let outcome = update_player(&mut actor, tuning, &*input, &grid, time.delta);
        if actor.grounded != was_grounded {
            debug!(
                "Actor {} at ({:.1}, {:.1}) after {} contact(s)",
                if actor.grounded { "landed" } else { "airborne" },
                actor.position.x,
                actor.position.y,
                outcome.contacts.len()
            );
        }
    }
}
