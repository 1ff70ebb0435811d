//! The static tile grid of a level.
//!
//! [`TileGrid`] owns a dense row-major array of [`Tile`]s with immutable
//! dimensions. Every coordinate access is bounds-checked and fails with
//! [`OutOfBounds`] instead of clamping. After all tiles are placed,
//! [`TileGrid::build_tile_data`] assigns visual variants, and
//! [`TileGrid::draw`] emits one draw request per visible cell to a
//! [`TileSink`].
//!
//! The grid is inserted into the world as a resource once loading has
//! finished, so systems never observe a partially built level.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;
use thiserror::Error;

use crate::components::tile::{Tile, TileVariant};
use crate::resources::autotile::{AutoTileRules, neighbor_mask};

/// Default edge length of a tile in world units.
pub const DEFAULT_TILE_SIZE: f32 = 32.0;

/// A coordinate outside `[0, width) x [0, height)` was used.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Receiver of tile draw requests.
///
/// Implemented by the renderer; tests use a `Vec` to record calls.
pub trait TileSink {
    fn draw_tile(&mut self, world_x: f32, world_y: f32, variant: TileVariant);
}

impl TileSink for Vec<(f32, f32, TileVariant)> {
    fn draw_tile(&mut self, world_x: f32, world_y: f32, variant: TileVariant) {
        self.push((world_x, world_y, variant));
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid with every cell empty.
    ///
    /// # Panics
    /// If `width` or `height` is zero, or `tile_size` is not positive.
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        assert!(tile_size > 0.0, "tile size must be positive");
        Self {
            width,
            height,
            tile_size,
            cells: vec![Tile::EMPTY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of a cell in world units.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, OutOfBounds> {
        if self.in_bounds(x, y) {
            Ok(y as usize * self.width as usize + x as usize)
        } else {
            Err(OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Read the tile at `(x, y)`.
    pub fn get_tile(&self, x: i32, y: i32) -> Result<Tile, OutOfBounds> {
        let i = self.index(x, y)?;
        Ok(self.cells[i])
    }

    /// Overwrite the tile at `(x, y)`. Last write wins.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> Result<(), OutOfBounds> {
        let i = self.index(x, y)?;
        self.cells[i] = tile;
        Ok(())
    }

    /// Solidity lookup that treats off-grid cells as empty.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).map(|t| t.solid).unwrap_or(false)
    }

    /// Recompute the visual variant of every cell.
    ///
    /// Solid cells get `rules.variant_for(mask)` of their 4-neighbor mask;
    /// empty cells are reset to no variant. Masks are computed from a
    /// snapshot of solidity, so the result does not depend on cell order and
    /// repeated calls are idempotent.
    pub fn build_tile_data(&mut self, rules: &AutoTileRules) {
        let variants: Vec<Option<TileVariant>> = self
            .iter()
            .map(|(x, y, tile)| {
                tile.solid
                    .then(|| rules.variant_for(neighbor_mask(x, y, |nx, ny| self.is_solid(nx, ny))))
            })
            .collect();
        for (cell, variant) in self.cells.iter_mut().zip(variants) {
            cell.variant = variant;
        }
    }

    /// Emit `(x * tile_size, y * tile_size, variant)` for each visible cell,
    /// in row-major order.
    pub fn draw(&self, sink: &mut impl TileSink) {
        for (x, y, tile) in self.iter() {
            if let Some(variant) = tile.variant {
                sink.draw_tile(
                    x as f32 * self.tile_size,
                    y as f32 * self.tile_size,
                    variant,
                );
            }
        }
    }

    /// Iterate `(x, y, tile)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Tile)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, tile)| ((i % width) as i32, (i / width) as i32, tile))
    }

    /// World-space (min, max) corners of cell `(x, y)`. Not bounds-checked.
    pub fn cell_rect(&self, x: i32, y: i32) -> (Vector2, Vector2) {
        let min = Vector2::new(x as f32 * self.tile_size, y as f32 * self.tile_size);
        let max = Vector2::new(min.x + self.tile_size, min.y + self.tile_size);
        (min, max)
    }

    /// Cell coordinate containing a world-space coordinate along one axis.
    pub fn world_to_cell(&self, world: f32) -> i32 {
        (world / self.tile_size).floor() as i32
    }

    /// Number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|t| t.solid).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::autotile::neighbors::*;

    fn grid() -> TileGrid {
        TileGrid::new(4, 3, DEFAULT_TILE_SIZE)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let g = grid();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.solid_count(), 0);
        for (_, _, tile) in g.iter() {
            assert_eq!(*tile, Tile::EMPTY);
        }
    }

    #[test]
    #[should_panic]
    fn test_zero_width_panics() {
        TileGrid::new(0, 3, DEFAULT_TILE_SIZE);
    }

    #[test]
    fn test_set_then_get() {
        let mut g = grid();
        let tile = Tile {
            solid: true,
            variant: Some(7),
        };
        g.set_tile(3, 2, tile).unwrap();
        assert_eq!(g.get_tile(3, 2).unwrap(), tile);
        assert_eq!(g.get_tile(2, 2).unwrap(), Tile::EMPTY);
        assert_eq!(g.solid_count(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let mut g = grid();
        g.set_tile(1, 1, Tile::solid()).unwrap();
        g.set_tile(1, 1, Tile::EMPTY).unwrap();
        assert_eq!(g.get_tile(1, 1).unwrap(), Tile::EMPTY);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut g = grid();
        for (x, y) in [(-1, 0), (4, 0), (0, -1), (0, 3), (i32::MIN, i32::MAX)] {
            let err = g.get_tile(x, y).unwrap_err();
            assert_eq!(
                err,
                OutOfBounds {
                    x,
                    y,
                    width: 4,
                    height: 3
                }
            );
            assert!(g.set_tile(x, y, Tile::solid()).is_err());
        }
        assert_eq!(g.solid_count(), 0);
    }

    #[test]
    fn test_is_solid_off_grid_is_false() {
        let mut g = grid();
        g.set_tile(0, 0, Tile::solid()).unwrap();
        assert!(g.is_solid(0, 0));
        assert!(!g.is_solid(-1, 0));
        assert!(!g.is_solid(0, -1));
    }

    #[test]
    fn test_build_tile_data_masks() {
        // Row of three solid cells on row 1.
        let mut g = grid();
        for x in 0..3 {
            g.set_tile(x, 1, Tile::solid()).unwrap();
        }
        g.build_tile_data(&AutoTileRules::default());
        assert_eq!(g.get_tile(0, 1).unwrap().variant, Some(E as TileVariant));
        assert_eq!(g.get_tile(1, 1).unwrap().variant, Some((E | W) as TileVariant));
        assert_eq!(g.get_tile(2, 1).unwrap().variant, Some(W as TileVariant));
        assert_eq!(g.get_tile(3, 1).unwrap().variant, None);
        assert_eq!(g.get_tile(1, 0).unwrap().variant, None);
    }

    #[test]
    fn test_build_tile_data_clears_empty_cells() {
        let mut g = grid();
        g.set_tile(
            2,
            2,
            Tile {
                solid: false,
                variant: Some(3),
            },
        )
        .unwrap();
        g.build_tile_data(&AutoTileRules::default());
        assert_eq!(g.get_tile(2, 2).unwrap(), Tile::EMPTY);
    }

    #[test]
    fn test_build_tile_data_is_idempotent() {
        let mut g = grid();
        for (x, y) in [(0, 0), (1, 0), (1, 1), (3, 2)] {
            g.set_tile(x, y, Tile::solid()).unwrap();
        }
        let rules = AutoTileRules::default();
        g.build_tile_data(&rules);
        let first = g.clone();
        g.build_tile_data(&rules);
        assert_eq!(g, first);
    }

    #[test]
    fn test_build_tile_data_ignores_placement_order() {
        let cells = [(0, 0), (1, 0), (2, 0), (1, 1), (1, 2), (3, 2)];
        let rules = AutoTileRules::default();

        let mut forward = grid();
        for &(x, y) in &cells {
            forward.set_tile(x, y, Tile::solid()).unwrap();
        }
        forward.build_tile_data(&rules);

        let mut reversed = grid();
        // Overwritten by the later placement of the same cell.
        reversed.set_tile(1, 1, Tile::EMPTY).unwrap();
        for &(x, y) in cells.iter().rev() {
            reversed.set_tile(x, y, Tile::solid()).unwrap();
        }
        reversed.set_tile(1, 1, Tile::solid()).unwrap();
        reversed.build_tile_data(&rules);

        assert_eq!(forward, reversed);
        assert_eq!(
            forward.get_tile(1, 1).unwrap().variant,
            Some((N | S) as TileVariant)
        );
    }

    #[test]
    fn test_build_tile_data_uses_custom_rules() {
        let mut g = grid();
        g.set_tile(0, 0, Tile::solid()).unwrap();
        let rules = AutoTileRules::new([42; 16]);
        g.build_tile_data(&rules);
        assert_eq!(g.get_tile(0, 0).unwrap().variant, Some(42));
    }

    #[test]
    fn test_draw_emits_visible_cells_row_major() {
        let mut g = grid();
        g.set_tile(1, 2, Tile::solid()).unwrap();
        g.set_tile(3, 0, Tile::solid()).unwrap();
        g.build_tile_data(&AutoTileRules::default());

        let mut calls: Vec<(f32, f32, TileVariant)> = Vec::new();
        g.draw(&mut calls);
        assert_eq!(calls, vec![(96.0, 0.0, 0), (32.0, 64.0, 0)]);
    }

    #[test]
    fn test_draw_before_build_emits_nothing() {
        let mut g = grid();
        g.set_tile(1, 1, Tile::solid()).unwrap();
        let mut calls: Vec<(f32, f32, TileVariant)> = Vec::new();
        g.draw(&mut calls);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_world_to_cell_floors() {
        let g = grid();
        assert_eq!(g.world_to_cell(0.0), 0);
        assert_eq!(g.world_to_cell(31.9), 0);
        assert_eq!(g.world_to_cell(32.0), 1);
        assert_eq!(g.world_to_cell(-0.5), -1);
    }

    #[test]
    fn test_cell_rect() {
        let g = grid();
        let (min, max) = g.cell_rect(2, 1);
        assert_eq!(min, Vector2::new(64.0, 32.0));
        assert_eq!(max, Vector2::new(96.0, 64.0));
    }
}
