//! Neighbor-driven tile variant selection.
//!
//! Every solid cell gets a 4-bit mask of which orthogonal neighbors are also
//! solid (off-grid neighbors count as empty). The mask indexes a 16-entry
//! table of visual variants supplied by the level art.
//!
//! # Rules File Format
//!
//! ```json
//! { "variants": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15] }
//! ```
//!
//! Entry `i` is the variant drawn for mask `i`.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::components::tile::TileVariant;

/// Neighbor direction flags for the 4-bit mask.
pub mod neighbors {
    pub const N: u8 = 0b0001;
    pub const E: u8 = 0b0010;
    pub const S: u8 = 0b0100;
    pub const W: u8 = 0b1000;
}

/// Number of distinct neighbor masks.
pub const MASK_COUNT: usize = 16;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read autotile rules: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse autotile rules: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("autotile rules need exactly {MASK_COUNT} variants, got {0}")]
    WrongLength(usize),
}

#[derive(Deserialize)]
struct RulesFile {
    variants: Vec<TileVariant>,
}

/// Mask-to-variant lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoTileRules {
    variants: [TileVariant; MASK_COUNT],
}

impl Default for AutoTileRules {
    /// Identity table: the variant equals the mask, matching a 16-tile sheet
    /// laid out in mask order (15 is the interior tile).
    fn default() -> Self {
        let mut variants = [0; MASK_COUNT];
        for (mask, variant) in variants.iter_mut().enumerate() {
            *variant = mask as TileVariant;
        }
        Self { variants }
    }
}

impl AutoTileRules {
    pub fn new(variants: [TileVariant; MASK_COUNT]) -> Self {
        Self { variants }
    }

    /// Build a table from a variant list, which must have one entry per mask.
    pub fn from_slice(variants: &[TileVariant]) -> Result<Self, RulesError> {
        let variants: [TileVariant; MASK_COUNT] = variants
            .try_into()
            .map_err(|_| RulesError::WrongLength(variants.len()))?;
        Ok(Self { variants })
    }

    /// Parse a rules JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, RulesError> {
        let file: RulesFile = serde_json::from_slice(bytes)?;
        Self::from_slice(&file.variants)
    }

    /// Load a rules JSON file from disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    /// Variant for a neighbor mask. Only the low four bits are used.
    pub fn variant_for(&self, mask: u8) -> TileVariant {
        self.variants[(mask & 0x0F) as usize]
    }
}

/// Calculate the 4-neighbor mask of the cell at `(x, y)`.
///
/// `is_solid` must report `false` for coordinates outside the grid.
pub fn neighbor_mask<F>(x: i32, y: i32, is_solid: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    use neighbors::*;

    let mut mask = 0u8;
    if is_solid(x, y - 1) {
        mask |= N;
    }
    if is_solid(x + 1, y) {
        mask |= E;
    }
    if is_solid(x, y + 1) {
        mask |= S;
    }
    if is_solid(x - 1, y) {
        mask |= W;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::neighbors::*;
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let rules = AutoTileRules::default();
        for mask in 0..MASK_COUNT as u8 {
            assert_eq!(rules.variant_for(mask), mask as TileVariant);
        }
    }

    #[test]
    fn test_variant_for_ignores_high_bits() {
        let rules = AutoTileRules::default();
        assert_eq!(rules.variant_for(0xF0 | E), E as TileVariant);
    }

    #[test]
    fn test_neighbor_mask_all_sides() {
        assert_eq!(neighbor_mask(1, 1, |_, _| true), N | E | S | W);
        assert_eq!(neighbor_mask(1, 1, |_, _| false), 0);
    }

    #[test]
    fn test_neighbor_mask_single_sides() {
        assert_eq!(neighbor_mask(5, 5, |x, y| (x, y) == (5, 4)), N);
        assert_eq!(neighbor_mask(5, 5, |x, y| (x, y) == (6, 5)), E);
        assert_eq!(neighbor_mask(5, 5, |x, y| (x, y) == (5, 6)), S);
        assert_eq!(neighbor_mask(5, 5, |x, y| (x, y) == (4, 5)), W);
    }

    #[test]
    fn test_from_json() {
        let json = br#"{"variants":[15,14,13,12,11,10,9,8,7,6,5,4,3,2,1,0]}"#;
        let rules = AutoTileRules::from_json(json).unwrap();
        assert_eq!(rules.variant_for(0), 15);
        assert_eq!(rules.variant_for(15), 0);
    }

    #[test]
    fn test_from_json_wrong_length() {
        let err = AutoTileRules::from_json(br#"{"variants":[1,2,3]}"#).unwrap_err();
        assert!(matches!(err, RulesError::WrongLength(3)));
    }

    #[test]
    fn test_from_json_negative_variant_is_parse_error() {
        let json = br#"{"variants":[-1,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15]}"#;
        assert!(matches!(
            AutoTileRules::from_json(json),
            Err(RulesError::Parse(_))
        ));
    }
}
