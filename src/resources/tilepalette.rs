//! Mapping from level-file tile types to tile properties.
//!
//! Level files identify tiles by an opaque integer `type`. The palette
//! decides which of those ids produce solid cells. By default only type `0`
//! is empty; every other id is solid.

use log::warn;
use rustc_hash::FxHashSet;

use crate::components::tile::Tile;

/// Tile type id as written in level files.
pub type TileTypeId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePalette {
    empty_types: FxHashSet<TileTypeId>,
}

impl Default for TilePalette {
    fn default() -> Self {
        Self::with_empty_types([0])
    }
}

impl TilePalette {
    /// Palette where the given ids are empty and everything else is solid.
    pub fn with_empty_types(ids: impl IntoIterator<Item = TileTypeId>) -> Self {
        Self {
            empty_types: ids.into_iter().collect(),
        }
    }

    /// Parse a comma separated id list such as `"0, 5, 6"`.
    ///
    /// Blank entries are ignored. Entries that are not non-negative integers
    /// are skipped with a warning.
    pub fn parse_empty_types(list: &str) -> Self {
        Self::with_empty_types(list.split(',').filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            match entry.parse::<TileTypeId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Ignoring empty tile type '{}': {}", entry, e);
                    None
                }
            }
        }))
    }

    pub fn is_solid(&self, type_id: TileTypeId) -> bool {
        !self.empty_types.contains(&type_id)
    }

    /// Tile placed in the grid for a level-file type id.
    pub fn tile_for(&self, type_id: TileTypeId) -> Tile {
        if self.is_solid(type_id) {
            Tile::solid()
        } else {
            Tile::EMPTY
        }
    }

    /// Sorted list of empty ids, for writing back to config.
    pub fn empty_types(&self) -> Vec<TileTypeId> {
        let mut ids: Vec<_> = self.empty_types.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = TilePalette::default();
        assert!(!palette.is_solid(0));
        assert!(palette.is_solid(1));
        assert!(palette.is_solid(99));
        assert_eq!(palette.tile_for(1), Tile::solid());
        assert_eq!(palette.tile_for(0), Tile::EMPTY);
    }

    #[test]
    fn test_parse_empty_types() {
        let palette = TilePalette::parse_empty_types(" 0, 5 ,x, 6,");
        assert_eq!(palette.empty_types(), vec![0, 5, 6]);
        assert!(palette.is_solid(1));
        assert!(!palette.is_solid(5));
    }

    #[test]
    fn test_parse_empty_types_skips_malformed_entries() {
        let palette = TilePalette::parse_empty_types("-1, 2.5, 7, 99999999999, , seven");
        assert_eq!(palette.empty_types(), vec![7]);
        assert!(palette.is_solid(0));

        assert!(TilePalette::parse_empty_types("").empty_types().is_empty());
    }
}
