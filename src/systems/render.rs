//! Rendering.
//!
//! The grid is drawn through [`TileGrid::draw`] into [`RaylibTileSink`],
//! which paints each visible tile as a filled rectangle shaded by its
//! variant. Variants only carry neighbor information under the default
//! identity rules, so the grass strip on exposed tops is drawn only when no
//! custom rules file is configured. Actors are drawn as their bounding box. With
//! [`DebugMode`] present, the cells each actor touches are outlined and its
//! velocity and grounded flag are printed.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::actor::Actor;
use crate::resources::autotile::neighbors;
use crate::resources::debugmode::DebugMode;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates};
use crate::resources::tilegrid::{TileGrid, TileSink};
use crate::systems::collision::overlapping_cells;

const BACKGROUND: Color = Color::new(24, 20, 37, 255);
const TILE_BASE: Color = Color::new(139, 94, 60, 255);
const TILE_TOP: Color = Color::new(99, 199, 77, 255);
const PLAYER: Color = Color::new(254, 231, 97, 255);

/// Fill colour for a tile variant.
///
/// Variants are treated as neighbor masks: each connected side darkens the
/// base colour a little so interior tiles read darker than edges.
pub fn variant_color(variant: u16) -> Color {
    let connected = (variant & 0x0F).count_ones() as u8;
    let shade = connected * 14;
    Color::new(
        TILE_BASE.r.saturating_sub(shade),
        TILE_BASE.g.saturating_sub(shade),
        TILE_BASE.b.saturating_sub(shade / 2),
        255,
    )
}

/// Whether a tile gets the grass strip: variants are neighbor masks and
/// the N bit is clear.
pub fn has_top_strip(variant: u16, variants_are_masks: bool) -> bool {
    variants_are_masks && variant & u16::from(neighbors::N) == 0
}

/// [`TileSink`] drawing rectangles on any raylib draw handle.
pub struct RaylibTileSink<'a, D: RaylibDraw> {
    d: &'a mut D,
    tile_size: i32,
    variants_are_masks: bool,
}

impl<'a, D: RaylibDraw> RaylibTileSink<'a, D> {
    pub fn new(d: &'a mut D, tile_size: f32) -> Self {
        Self {
            d,
            tile_size: tile_size.round() as i32,
            variants_are_masks: true,
        }
    }

    /// Declare whether variants come from the identity rules table.
    pub fn with_mask_variants(mut self, variants_are_masks: bool) -> Self {
        self.variants_are_masks = variants_are_masks;
        self
    }
}

impl<D: RaylibDraw> TileSink for RaylibTileSink<'_, D> {
    fn draw_tile(&mut self, world_x: f32, world_y: f32, variant: u16) {
        let (x, y, s) = (world_x as i32, world_y as i32, self.tile_size);
        self.d.draw_rectangle(x, y, s, s, variant_color(variant));
        if has_top_strip(variant, self.variants_are_masks) {
            self.d.draw_rectangle(x, y, s, (s / 6).max(1), TILE_TOP);
        }
    }
}

/// Draw the level and the actors.
pub fn render_pass<D: RaylibDraw>(world: &mut World, d: &mut D) {
    let variants_are_masks = world
        .get_resource::<GameConfig>()
        .is_none_or(|config| config.autotile_path.is_none());
    if let Some(grid) = world.get_resource::<TileGrid>() {
        let mut sink =
            RaylibTileSink::new(d, grid.tile_size()).with_mask_variants(variants_are_masks);
        grid.draw(&mut sink);
    }

    let actors: Vec<Actor> = world.query::<&Actor>().iter(world).copied().collect();
    for actor in &actors {
        let (min, max) = actor.aabb();
        d.draw_rectangle_v(min, max - min, PLAYER);
    }

    if !world.contains_resource::<DebugMode>() {
        return;
    }
    let Some(grid) = world.get_resource::<TileGrid>() else {
        return;
    };
    for actor in &actors {
        let (min, max) = actor.aabb();
        if let Some((x0, x1, y0, y1)) = overlapping_cells(grid, min, max) {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let (cmin, cmax) = grid.cell_rect(x, y);
                    let color = if grid.is_solid(x, y) {
                        Color::RED
                    } else {
                        Color::SKYBLUE
                    };
                    d.draw_rectangle_lines(
                        cmin.x as i32,
                        cmin.y as i32,
                        (cmax.x - cmin.x) as i32,
                        (cmax.y - cmin.y) as i32,
                        color,
                    );
                }
            }
        }
        d.draw_rectangle_lines(
            min.x as i32,
            min.y as i32,
            (max.x - min.x) as i32,
            (max.y - min.y) as i32,
            Color::RED,
        );
    }
}

/// Text overlay: load state and, in debug mode, per-actor diagnostics.
pub fn render_debug_ui<D: RaylibDraw>(world: &mut World, d: &mut D, fps: u32) {
    if let Some(state) = world.get_resource::<GameState>() {
        match state.get() {
            GameStates::Loading => d.draw_text("Loading...", 10, 10, 20, Color::RAYWHITE),
            GameStates::Failed => d.draw_text("Level failed to load", 10, 10, 20, Color::RED),
            _ => {}
        }
    }

    if !world.contains_resource::<DebugMode>() {
        return;
    }
    d.draw_text(
        &format!("DEBUG MODE (press F11 to toggle) | FPS: {}", fps),
        10,
        36,
        10,
        Color::RAYWHITE,
    );
    let mut q = world.query::<&Actor>();
    for (i, actor) in q.iter(world).enumerate() {
        let text = format!(
            "pos ({:.1}, {:.1}) vel ({:.1}, {:.1}) grounded: {}",
            actor.position.x, actor.position.y, actor.velocity.x, actor.velocity.y, actor.grounded
        );
        d.draw_text(&text, 10, 52 + 16 * i as i32, 10, Color::RAYWHITE);
    }
}

/// Exclusive system: open a drawing scope and run both passes.
pub fn render_system(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        return;
    };
    let Some(thread) = world.remove_non_send_resource::<RaylibThread>() else {
        world.insert_non_send_resource(rl);
        return;
    };

    let fps = rl.get_fps();
    {
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(BACKGROUND);
        render_pass(world, &mut d);
        render_debug_ui(world, &mut d, fps);
    }

    world.insert_non_send_resource(thread);
    world.insert_non_send_resource(rl);
}
