//! Actor vs tile collision resolution.
//!
//! [`resolve_tile_collisions`] corrects an [`Actor`] that has just been moved
//! by the player controller so that it no longer overlaps solid cells of the
//! [`TileGrid`]. Each frame:
//!
//! - `grounded` is reset to `false`.
//! - The actor's box is mapped to the range of cells it covers, clamped to
//!   the grid. Off-grid space is empty, so actors near or past the map edge
//!   never query invalid cells.
//! - Overlapping solid cells are collected and visited once each, largest
//!   overlap first. At each visit the penetration is recomputed against the
//!   already-corrected box and the actor is pushed out along the axis of
//!   smaller penetration, zeroing velocity on that axis.
//! - A push upward marks the actor as grounded.
//!
//! The pass is total: it never fails and always terminates, even for an
//! actor buried inside solid tiles.

use log::trace;
use raylib::prelude::Vector2;
use smallvec::SmallVec;

use crate::components::actor::Actor;
use crate::resources::tilegrid::TileGrid;

/// Direction an actor was pushed to leave a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDirection {
    /// Tile was below the actor; the actor is now standing on it.
    Up,
    /// Tile was above the actor.
    Down,
    Left,
    Right,
}

/// One resolved actor/tile overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub cell_x: i32,
    pub cell_y: i32,
    pub direction: PushDirection,
    /// Distance the actor was moved.
    pub depth: f32,
}

/// Contacts resolved during one pass, in resolution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub contacts: SmallVec<[Contact; 4]>,
}

impl CollisionOutcome {
    /// True if nothing was resolved (actor state is unchanged apart from `grounded`).
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// True if any contact pushed the actor upward.
    pub fn landed(&self) -> bool {
        self.contacts
            .iter()
            .any(|c| c.direction == PushDirection::Up)
    }
}

/// Inclusive cell range `(x0, x1, y0, y1)` covered by the box `min..max`,
/// clamped to the grid. `None` if the box lies entirely off-grid or has
/// non-finite coordinates.
pub fn overlapping_cells(
    grid: &TileGrid,
    min: Vector2,
    max: Vector2,
) -> Option<(i32, i32, i32, i32)> {
    if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
        return None;
    }
    let x0 = grid.world_to_cell(min.x).max(0);
    let y0 = grid.world_to_cell(min.y).max(0);
    let x1 = grid.world_to_cell(max.x).min(grid.width() as i32 - 1);
    let y1 = grid.world_to_cell(max.y).min(grid.height() as i32 - 1);
    (x0 <= x1 && y0 <= y1).then_some((x0, x1, y0, y1))
}

/// Push `actor` out of every solid tile it overlaps. See the module docs.
pub fn resolve_tile_collisions(actor: &mut Actor, grid: &TileGrid) -> CollisionOutcome {
    actor.grounded = false;
    let mut outcome = CollisionOutcome::default();

    let collider = actor.collider();
    let (min, max) = collider.aabb(actor.position);
    let Some((x0, x1, y0, y1)) = overlapping_cells(grid, min, max) else {
        return outcome;
    };

    // (x, y, overlap area)
    let mut candidates: SmallVec<[(i32, i32, f32); 8]> = SmallVec::new();
    for y in y0..=y1 {
        for x in x0..=x1 {
            if !grid.is_solid(x, y) {
                continue;
            }
            let (tile_min, tile_max) = grid.cell_rect(x, y);
            if let Some(depth) = collider.penetration(actor.position, tile_min, tile_max) {
                candidates.push((x, y, depth.x * depth.y));
            }
        }
    }
    // Stable sort keeps row-major order among equal overlaps.
    candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

    for (x, y, _) in candidates {
        let (tile_min, tile_max) = grid.cell_rect(x, y);
        // Earlier pushes may already have cleared this tile.
        let Some(depth) = collider.penetration(actor.position, tile_min, tile_max) else {
            continue;
        };
        let center = collider.center(actor.position);
        let tile_center = Vector2::new(
            (tile_min.x + tile_max.x) * 0.5,
            (tile_min.y + tile_max.y) * 0.5,
        );

        // Ties resolve vertically.
        let direction = if depth.x < depth.y {
            if center.x < tile_center.x {
                PushDirection::Left
            } else {
                PushDirection::Right
            }
        } else if center.y < tile_center.y {
            PushDirection::Up
        } else {
            PushDirection::Down
        };

        let moved = match direction {
            PushDirection::Left => {
                actor.position.x -= depth.x;
                actor.velocity.x = 0.0;
                depth.x
            }
            PushDirection::Right => {
                actor.position.x += depth.x;
                actor.velocity.x = 0.0;
                depth.x
            }
            PushDirection::Up => {
                actor.position.y -= depth.y;
                actor.velocity.y = 0.0;
                actor.grounded = true;
                depth.y
            }
            PushDirection::Down => {
                actor.position.y += depth.y;
                actor.velocity.y = 0.0;
                depth.y
            }
        };

        let contact = Contact {
            cell_x: x,
            cell_y: y,
            direction,
            depth: moved,
        };
        trace!("Resolved {:?}", contact);
        outcome.contacts.push(contact);
    }

    outcome
}
