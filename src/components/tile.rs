//! Static tile cell data.
//!
//! A [`Tile`] is a plain value stored in a [`TileGrid`](crate::resources::tilegrid::TileGrid)
//! cell. It has no identity beyond the cell it lives in.

/// Visual variant index selected by auto-tiling.
pub type TileVariant = u16;

/// A single grid cell: solidity plus the visual variant picked for it.
///
/// `variant` is `None` for empty cells and for solid cells whose variants
/// have not been computed yet by
/// [`TileGrid::build_tile_data`](crate::resources::tilegrid::TileGrid::build_tile_data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    /// Whether actors collide with this cell.
    pub solid: bool,
    /// Sprite variant to draw, or `None` when nothing is drawn.
    pub variant: Option<TileVariant>,
}

impl Tile {
    /// An empty, non-solid cell.
    pub const EMPTY: Tile = Tile {
        solid: false,
        variant: None,
    };

    /// A solid cell waiting for auto-tiling.
    pub fn solid() -> Self {
        Self {
            solid: true,
            variant: None,
        }
    }
}
